use std::io::Write;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, TrackMatch, find_match};
use crate::config::LibrarySettings;
use crate::error::Result;
use crate::library::{AudioFile, Candidate, TagStore, format_bpm, scan};

use super::report::{ItemFailure, RunReport, SkipReason, TaggedFile};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Process files that already carry a BPM.
    pub overwrite: bool,
    /// Print a line per tagged file.
    pub verbose: bool,
}

/// Scan → filter → match → fetch tempo → write, one file at a time.
pub struct Tagger<C, S> {
    catalog: C,
    store: S,
    library: LibrarySettings,
    options: RunOptions,
}

impl<C: Catalog, S: TagStore> Tagger<C, S> {
    pub fn new(catalog: C, store: S, library: LibrarySettings, options: RunOptions) -> Self {
        Self {
            catalog,
            store,
            library,
            options,
        }
    }

    /// Tag every eligible file under `root`, writing progress lines to `out`.
    ///
    /// Scan and catalog failures abort the run. Everything that goes wrong
    /// with a single file ends up in the returned report instead.
    pub fn run(&mut self, root: &Path, out: &mut impl Write) -> Result<RunReport> {
        let mut report = RunReport::default();
        let shown =
            |path: &Path| -> PathBuf { path.strip_prefix(root).unwrap_or(path).to_path_buf() };

        let paths = scan(root, &self.library)?;
        report.found = paths.len();
        writeln!(out, "Found {} files", report.found)?;

        let mut eligible: Vec<AudioFile> = Vec::new();
        for path in paths {
            match self.store.load(&path) {
                Ok(tags) => {
                    report.readable += 1;
                    if tags.has_bpm() {
                        report.already_tagged += 1;
                    }
                    if !tags.has_bpm() || self.options.overwrite {
                        eligible.push(AudioFile { path, tags });
                    }
                }
                Err(err) => {
                    writeln!(out, "Skipping {}: {err}", shown(&path).display())?;
                    tracing::debug!(path = %path.display(), error = %err, "tag unreadable");
                    report.failures.push(ItemFailure {
                        path,
                        reason: SkipReason::Unreadable(err),
                    });
                }
            }
        }
        report.eligible = eligible.len();
        writeln!(
            out,
            "{}/{} already have a BPM",
            report.already_tagged, report.readable
        )?;

        let mut worklist: Vec<(AudioFile, Candidate)> = Vec::with_capacity(eligible.len());
        for file in eligible {
            match file.tags.candidate() {
                Some(candidate) => worklist.push((file, candidate)),
                None => {
                    writeln!(
                        out,
                        "Skipping {}: {}",
                        shown(&file.path).display(),
                        SkipReason::MissingArtistOrTitle
                    )?;
                    report.failures.push(ItemFailure {
                        path: file.path,
                        reason: SkipReason::MissingArtistOrTitle,
                    });
                }
            }
        }

        let mut matches: Vec<(AudioFile, TrackMatch)> = Vec::with_capacity(worklist.len());
        for (file, candidate) in worklist {
            match find_match(&mut self.catalog, &candidate)? {
                Some(hit) => {
                    tracing::info!(
                        path = %file.path.display(),
                        id = %hit.id,
                        title = %hit.matched_title,
                        "matched"
                    );
                    matches.push((file, hit));
                }
                None => {
                    writeln!(
                        out,
                        "Unable to find {} - {} in the catalog",
                        candidate.title, candidate.artist
                    )?;
                    report.failures.push(ItemFailure {
                        path: file.path,
                        reason: SkipReason::Unmatched {
                            artist: candidate.artist,
                            title: candidate.title,
                        },
                    });
                }
            }
        }
        report.matched = matches.len();
        writeln!(
            out,
            "Found {}/{} corresponding songs",
            report.matched, report.eligible
        )?;

        let tempos = self.fetch_tempos(matches, &mut report, &mut *out, &shown)?;

        for (file, bpm) in tempos {
            match self.store.write_bpm(&file.path, bpm) {
                Ok(()) => {
                    if self.options.verbose {
                        writeln!(
                            out,
                            "Wrote {} as BPM to {}",
                            format_bpm(bpm),
                            shown(&file.path).display()
                        )?;
                    }
                    report.tagged.push(TaggedFile {
                        path: file.path,
                        bpm,
                    });
                }
                Err(err) => {
                    writeln!(
                        out,
                        "Failed to write BPM to {}: {err}",
                        shown(&file.path).display()
                    )?;
                    tracing::warn!(path = %file.path.display(), error = %err, "write failed");
                    report.failures.push(ItemFailure {
                        path: file.path,
                        reason: SkipReason::WriteFailed(err),
                    });
                }
            }
        }

        writeln!(
            out,
            "Wrote BPMs to {}/{} files",
            report.tagged.len(),
            report.eligible
        )?;
        let write_failures = report.write_failures();
        if write_failures > 0 {
            writeln!(out, "Failed to write BPMs to {write_failures} files")?;
        }
        writeln!(out, "Done!")?;

        Ok(report)
    }

    fn fetch_tempos(
        &mut self,
        matches: Vec<(AudioFile, TrackMatch)>,
        report: &mut RunReport,
        out: &mut impl Write,
        shown: &impl Fn(&Path) -> PathBuf,
    ) -> Result<Vec<(AudioFile, f64)>> {
        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<_> = matches.iter().map(|(_, hit)| hit.id.clone()).collect();
        let features = self.catalog.audio_features(&ids)?;

        let mut tempos = Vec::with_capacity(matches.len());
        for ((file, hit), feature) in matches.into_iter().zip(features) {
            let tempo = feature
                .filter(|f| f.id == hit.id)
                .and_then(|f| f.tempo)
                .filter(|t| t.is_finite() && *t > 0.0);
            match tempo {
                Some(tempo) => tempos.push((file, tempo)),
                None => {
                    writeln!(
                        out,
                        "Skipping {}: {}",
                        shown(&file.path).display(),
                        SkipReason::NoTempo
                    )?;
                    report.failures.push(ItemFailure {
                        path: file.path,
                        reason: SkipReason::NoTempo,
                    });
                }
            }
        }
        Ok(tempos)
    }
}

use std::io::{self, Write};

use crate::catalog::SpotifyClient;
use crate::cli::{self, Cli};
use crate::error::{Error, Result};
use crate::library::LoftyTagStore;
use crate::tagger::{RunOptions, Tagger};

pub mod logging;
mod settings;

pub fn run(args: Cli) -> Result<()> {
    let Some(folder) = args.folder else {
        println!("{}", cli::usage());
        return Ok(());
    };

    let settings = settings::load_settings();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Adding BPMs to {}", folder.display())?;

    let credentials = settings.catalog.credentials().ok_or_else(|| {
        Error::Config(
            "missing catalog credentials: set SPOTIPY_CLIENT_ID and SPOTIPY_CLIENT_SECRET \
             or catalog.client_id and catalog.client_secret"
                .to_string(),
        )
    })?;
    let catalog = SpotifyClient::new(&settings.catalog, credentials)?;

    let options = RunOptions {
        overwrite: args.overwrite,
        verbose: args.verbose,
    };
    let mut tagger = Tagger::new(catalog, LoftyTagStore, settings.library, options);
    let report = tagger.run(&folder, &mut out)?;

    for tagged in &report.tagged {
        tracing::debug!(path = %tagged.path.display(), bpm = tagged.bpm, "tagged");
    }
    for failure in &report.failures {
        tracing::debug!(path = %failure.path.display(), reason = %failure.reason, "skipped");
    }
    tracing::info!(
        found = report.found,
        tagged = report.tagged.len(),
        failed = report.failures.len(),
        "run finished"
    );
    Ok(())
}

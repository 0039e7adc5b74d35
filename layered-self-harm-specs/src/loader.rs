//! Fixture file loading.

use crate::{parse_fixture, NlpFixture, SpecError};
use std::fs;
use std::path::{Path, PathBuf};

/// Load a single fixture file.
pub fn load_fixture(path: &Path) -> Result<NlpFixture, SpecError> {
    let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_fixture(&content).map_err(|err| match err {
        SpecError::Parse { line, message } => SpecError::Parse {
            line,
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })
}

/// Load every `*.nlp` file under `dir`, with paths relative to `dir`,
/// sorted.
pub fn load_all_fixtures(dir: &Path) -> Result<Vec<(PathBuf, NlpFixture)>, SpecError> {
    let mut fixtures = Vec::new();
    load_fixtures_recursive(dir, dir, &mut fixtures)?;
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fixtures)
}

fn load_fixtures_recursive(
    base: &Path,
    dir: &Path,
    fixtures: &mut Vec<(PathBuf, NlpFixture)>,
) -> Result<(), SpecError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let load_err = |e: std::io::Error| SpecError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    };
    for entry in fs::read_dir(dir).map_err(load_err)? {
        let path = entry.map_err(load_err)?.path();

        if path.is_dir() {
            load_fixtures_recursive(base, &path, fixtures)?;
        } else if path.extension().map_or(false, |e| e == "nlp") {
            let relative = path.strip_prefix(base).unwrap_or(&path).to_path_buf();
            let fixture = load_fixture(&path)?;
            fixtures.push((relative, fixture));
        }
    }

    Ok(())
}

//! Line-by-line matching over stdin, files and directory trees.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context;
use bgrep_engine::{is_match, Engine};

/// Matches stdin as a single line, the way a shell pipe delivers one.
pub fn match_stdin(pattern: &str, engine: Engine) -> anyhow::Result<bool> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("read input text")?;

    Ok(is_match(pattern, trim_line_ending(&input), engine)?)
}

/// Matches each file line by line, printing matching lines. The `path:`
/// prefix appears whenever more than one file is searched.
pub fn match_files(pattern: &str, engine: Engine, paths: &[String]) -> anyhow::Result<bool> {
    let with_prefix = paths.len() > 1;

    let mut found = false;
    for path in paths {
        if match_file(pattern, engine, Path::new(path), with_prefix)? {
            found = true;
        }
    }
    Ok(found)
}

/// Walks the directory recursively, matching every regular file.
pub fn match_dir(pattern: &str, engine: Engine, dir: &Path) -> anyhow::Result<bool> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read input dir {}", dir.display()))?;

    let mut found = false;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read input dir {}", dir.display()))?
            .path();

        let found_here = if path.is_dir() {
            match_dir(pattern, engine, &path)?
        } else {
            match_file(pattern, engine, &path, true)?
        };

        if found_here {
            found = true;
        }
    }

    Ok(found)
}

fn match_file(
    pattern: &str,
    engine: Engine,
    path: &Path,
    with_prefix: bool,
) -> anyhow::Result<bool> {
    let file =
        File::open(path).with_context(|| format!("read input file {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut found = false;
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .with_context(|| format!("read input file {}", path.display()))?;
        if read == 0 {
            break;
        }

        let trimmed = trim_line_ending(&line);
        if is_match(pattern, trimmed, engine)? {
            found = true;

            let text = String::from_utf8_lossy(trimmed);
            if with_prefix {
                println!("{}:{}", path.display(), text);
            } else {
                println!("{}", text);
            }
        }
    }

    Ok(found)
}

/// Strips one trailing `\n` or `\r\n`; anchors assert against line content,
/// not the terminator.
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

use std::path::Path;

use rand::{seq::SliceRandom, thread_rng};
use tokio::io::AsyncWriteExt;

use crate::constants::USER_AGENTS;

/// Non-empty trimmed lines of a text file. A missing or unreadable file reads
/// as an empty list.
pub async fn read_file_lines(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();

    match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect(),
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}", path.display());
            Vec::new()
        }
    }
}

pub async fn append_line(path: impl AsRef<Path>, line: &str) -> eyre::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format!("{line}\n").as_bytes()).await?;

    Ok(())
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS.choose(&mut thread_rng()).copied().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_file_lines_trims_and_skips_blanks() {
        let dir = tempfile::tempdir().expect("Temp dir to be creatable");
        let path = dir.path().join("tokens.txt");
        tokio::fs::write(&path, "first\n\n  second  \n\t\nthird\n")
            .await
            .expect("File to be writable");

        let lines = read_file_lines(&path).await;

        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("Temp dir to be creatable");

        let lines = read_file_lines(dir.path().join("does-not-exist.txt")).await;

        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn append_line_accumulates_lines() {
        let dir = tempfile::tempdir().expect("Temp dir to be creatable");
        let path = dir.path().join("out.txt");

        append_line(&path, "one").await.expect("Append to succeed");
        append_line(&path, "two").await.expect("Append to succeed");

        assert_eq!(read_file_lines(&path).await, vec!["one", "two"]);
    }

    #[test]
    fn random_user_agent_comes_from_the_pool() {
        assert!(USER_AGENTS.contains(&random_user_agent()));
    }
}

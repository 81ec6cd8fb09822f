use crate::scoring::SkillVector;
use chrono::Local;
use directories::ProjectDirs;
use std::io;
use std::path::{Path, PathBuf};

/// Appends one row per completed session to the kiosk's local log, creating
/// the file with a header on first use. Operational record only; the word
/// tracker itself is never persisted.
pub fn append(rounds: usize, total_score: i32, skills: SkillVector) -> io::Result<()> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "empatia") {
        let dir = proj_dirs.data_local_dir();
        std::fs::create_dir_all(dir)?;
        append_to(&dir.join("sessions.csv"), rounds, total_score, skills)?;
    }
    Ok(())
}

pub fn append_to<P: AsRef<Path>>(
    path: P,
    rounds: usize,
    total_score: i32,
    skills: SkillVector,
) -> io::Result<PathBuf> {
    let path = path.as_ref().to_path_buf();
    let needs_header = !path.exists();

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if needs_header {
        writer.write_record([
            "date",
            "rounds",
            "total_score",
            "empathy",
            "active_listening",
            "self_awareness",
        ])?;
    }

    writer.write_record([
        Local::now().format("%c").to_string(),
        rounds.to_string(),
        total_score.to_string(),
        skills.empathy.to_string(),
        skills.active_listening.to_string(),
        skills.self_awareness.to_string(),
    ])?;
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_skill_vector;
    use tempfile::tempdir;

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.csv");

        append_to(&path, 3, 9, compute_skill_vector(9)).unwrap();
        append_to(&path, 3, 4, compute_skill_vector(4)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,rounds,total_score"));
        assert!(lines[1].ends_with("3,9,9,7,5"));
        assert!(lines[2].ends_with("3,4,7,5,3"));
    }
}

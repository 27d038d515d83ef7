//! Where the client keeps its files, and the stable user id it sends.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use animey_constant::app::{DATA_DIR, USER_ID_FILE, USER_ID_PREFIX};

const ID_LEN: usize = 9;

/// `ANIMEY_DATA_DIR`, else the platform data dir plus `animey`.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ANIMEY_DATA_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|d| d.join(DATA_DIR))
        .context("no data directory available; set ANIMEY_DATA_DIR")
}

/// `user_` followed by 9 lowercase base36 characters.
pub fn generate_user_id() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(USER_ID_PREFIX.len() + ID_LEN);
    id.push_str(USER_ID_PREFIX);
    for _ in 0..ID_LEN {
        let digit = (n % 36) as u32;
        n /= 36;
        id.push(char::from_digit(digit, 36).unwrap_or('0'));
    }
    id
}

/// Read the saved user id from `dir`, creating and saving one on first use.
pub fn load_or_create_user_id(dir: &Path) -> Result<String> {
    let path = dir.join(USER_ID_FILE);
    match std::fs::read_to_string(&path) {
        Ok(saved) if !saved.trim().is_empty() => return Ok(saved.trim().to_string()),
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    }

    let id = generate_user_id();
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    std::fs::write(&path, &id).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(user.id = %id, path = %path.display(), "new user id");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_original_shape() {
        let id = generate_user_id();
        assert!(id.starts_with("user_"));
        let rest = &id["user_".len()..];
        assert_eq!(rest.len(), 9);
        assert!(rest.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(generate_user_id(), generate_user_id());
    }

    #[test]
    fn user_id_is_stable_across_loads() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("animey");
        let first = load_or_create_user_id(&nested).unwrap();
        let second = load_or_create_user_id(&nested).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_file_gets_a_fresh_id() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(USER_ID_FILE), "\n").unwrap();
        let id = load_or_create_user_id(dir.path()).unwrap();
        assert!(id.starts_with(USER_ID_PREFIX));
    }
}

use giftshop_shared::catalog::Category;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

/// Activation instructions stored as `<dir>/<category>.txt`.
#[derive(Clone)]
pub struct InstructionService {
    dir: PathBuf,
}

impl InstructionService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `Ok(None)` when no file exists for the category.
    pub async fn load(&self, category: Category) -> io::Result<Option<String>> {
        let path = self.dir.join(format!("{}.txt", category.slug()));
        info!("Looking up instruction at {}", path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("No instruction for category '{}'", category);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_load_existing_and_missing() {
        let dir = std::env::temp_dir().join(format!("giftshop-instructions-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("steam.txt"), "Open Steam → Redeem a code")
            .await
            .unwrap();

        let service = InstructionService::new(&dir);
        assert_eq!(
            service.load(Category::Steam).await.unwrap().as_deref(),
            Some("Open Steam → Redeem a code")
        );
        assert_eq!(service.load(Category::Xbox).await.unwrap(), None);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_path_is_an_error() {
        let dir = std::env::temp_dir().join(format!("giftshop-instructions-{}", Uuid::new_v4()));
        // a directory where the file should be
        tokio::fs::create_dir_all(dir.join("amazon.txt")).await.unwrap();

        let service = InstructionService::new(&dir);
        assert!(service.load(Category::Amazon).await.is_err());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}

/// Turns a pet's stored image reference into a URL a client can display
#[derive(Debug, Clone, Default)]
pub struct MediaResolver {
    base_url: Option<String>,
}

impl MediaResolver {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    /// Absolute URLs pass through; bare file names are joined onto the media
    /// base URL. Without a base URL a bare file name cannot be resolved.
    pub fn resolve(&self, image_ref: Option<&str>) -> Option<String> {
        let image_ref = image_ref.map(str::trim).filter(|r| !r.is_empty())?;

        if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            return Some(image_ref.to_string());
        }

        self.base_url
            .as_ref()
            .map(|base| format!("{}/{}", base, image_ref.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_file_name() {
        let media = MediaResolver::new(Some("https://cdn.example/pets/".to_string()));
        assert_eq!(
            media.resolve(Some("PETA1B2C3.jpg")),
            Some("https://cdn.example/pets/PETA1B2C3.jpg".to_string())
        );
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let media = MediaResolver::new(None);
        assert_eq!(
            media.resolve(Some("https://drive.example/uc?id=abc")),
            Some("https://drive.example/uc?id=abc".to_string())
        );
    }

    #[test]
    fn test_unresolvable() {
        let media = MediaResolver::new(None);
        assert_eq!(media.resolve(Some("f2.jpg")), None);
        assert_eq!(media.resolve(Some("  ")), None);
        assert_eq!(media.resolve(None), None);
    }
}

/// A file received in a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name as sent by the client, possibly with path components
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Final path component of the client-supplied name
    pub fn client_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Lowercased extension of the client name, if any
    pub fn extension(&self) -> Option<String> {
        let name = self.client_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: None,
            data: Vec::new(),
        }
    }

    #[test]
    fn test_client_name_strips_directories() {
        assert_eq!(named("cover.png").client_name(), "cover.png");
        assert_eq!(named("../../etc/cover.png").client_name(), "cover.png");
        assert_eq!(named(r"C:\Users\me\cover.png").client_name(), "cover.png");
        assert_eq!(named("dir/").client_name(), "");
    }

    #[test]
    fn test_extension() {
        assert_eq!(named("cover.PNG").extension().as_deref(), Some("png"));
        assert_eq!(named("archive.tar.gif").extension().as_deref(), Some("gif"));
        assert_eq!(named("noext").extension(), None);
        assert_eq!(named(".png").extension(), None);
        assert_eq!(named("trailing.").extension(), None);
    }
}

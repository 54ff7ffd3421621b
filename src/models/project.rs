use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Storage-relative path, e.g. `projects/1700000000_cover.png`
    pub image: Option<String>,
    pub link: Option<String>,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Raw create input, before normalization and validation.
/// There is no `user_id`: the owner always comes from the caller.
#[derive(Debug, Clone, Default)]
pub struct CreateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Raw update input. The outer `Option` says whether the field was sent at
/// all; the inner one distinguishes a value from an explicit `null`.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub link: Option<Option<String>>,
}

/// Validated record ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub user_id: i64,
}

/// Validated partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub link: Option<Option<String>>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.link.is_none()
    }

    /// Drop every change that would write the value the project already has
    pub fn without_unchanged(self, current: &Project) -> Self {
        Self {
            title: self.title.filter(|t| *t != current.title),
            description: self.description.filter(|d| *d != current.description),
            image: self.image.filter(|i| *i != current.image),
            link: self.link.filter(|l| *l != current.link),
        }
    }

    pub fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(image) = &self.image {
            project.image = image.clone();
        }
        if let Some(link) = &self.link {
            project.link = link.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        let now = OffsetDateTime::now_utc();
        Project {
            id: 1,
            title: "Portfolio Site".to_string(),
            description: Some("v1".to_string()),
            image: None,
            link: Some("https://example.com".to_string()),
            user_id: 7,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_without_unchanged() {
        let current = project();
        let changes = ProjectChanges {
            title: Some("Portfolio Site".to_string()),
            description: Some(Some("v2".to_string())),
            image: Some(None),
            link: None,
        }
        .without_unchanged(&current);

        assert_eq!(
            changes,
            ProjectChanges {
                description: Some(Some("v2".to_string())),
                ..Default::default()
            }
        );
        assert!(ProjectChanges::default().without_unchanged(&current).is_empty());
    }

    #[test]
    fn test_apply_to() {
        let mut p = project();
        ProjectChanges {
            description: Some(None),
            image: Some(Some("projects/1_a.png".to_string())),
            ..Default::default()
        }
        .apply_to(&mut p);

        assert_eq!(p.title, "Portfolio Site");
        assert_eq!(p.description, None);
        assert_eq!(p.image.as_deref(), Some("projects/1_a.png"));
        assert_eq!(p.link.as_deref(), Some("https://example.com"));
    }
}

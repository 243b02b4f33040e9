//! CMS pages and system (email/SMS) templates

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
}

impl PageInput {
    /// Build a page input whose slug is derived from the title
    pub fn from_title(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            content: content.into(),
            is_published: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Page title is required".into()));
        }
        if !is_valid_slug(&self.slug) {
            return Err(Error::InvalidInput(format!(
                "Slug '{}' may only contain lowercase letters, digits and dashes",
                self.slug
            )));
        }
        Ok(())
    }
}

/// Lowercase, dash-separated slug from free text
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTemplate {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTemplateInput {
    pub name: String,
    #[serde(default)]
    pub subject: String,
    pub body: String,
}

impl SystemTemplateInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Template name is required".into()));
        }
        if self.body.trim().is_empty() {
            return Err(Error::InvalidInput("Template body is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Terms & Conditions"), "terms-conditions");
        assert_eq!(slugify("  About Us!  "), "about-us");
        assert_eq!(slugify("FAQ 2024"), "faq-2024");
    }

    #[test]
    fn test_page_validation() {
        assert!(PageInput::from_title("Privacy Policy", "...").validate().is_ok());

        let mut bad = PageInput::from_title("Privacy Policy", "...");
        bad.slug = "Privacy Policy".into();
        assert!(bad.validate().is_err());

        let empty = PageInput::from_title("!!!", "");
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_template_requires_body() {
        let input = SystemTemplateInput {
            name: "booking-confirmed".into(),
            subject: "Your booking".into(),
            body: "".into(),
        };
        assert!(input.validate().is_err());
    }
}

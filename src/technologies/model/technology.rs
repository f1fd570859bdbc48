use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
  #[serde(rename = "_id")]
  pub id: String,
  /// Always stored normalized, see [`normalize`].
  pub name: String,
}

/// Lowercases, trims and collapses inner whitespace so "  Node   JS" and
/// "node js" name the same tag. Returns `None` for blank input.
pub fn normalize(name: &str) -> Option<String> {
  let normalized = name
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();
  if normalized.is_empty() {
    None
  } else {
    Some(normalized)
  }
}

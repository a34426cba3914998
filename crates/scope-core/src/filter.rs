/// Minimum query length before filtering
/// starts.
pub const MIN_QUERY_CHARS: usize = 2;

/// What the task list should do after the
/// search box changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
  ShowAll,
  /// Too short to filter and not empty:
  /// keep whatever is currently shown.
  Keep,
  Filter(SearchQuery)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  needle: String
}

impl SearchQuery {
  #[must_use]
  pub fn needle(&self) -> &str {
    &self.needle
  }

  /// Case-insensitive substring match on the
  /// title or the description.
  #[must_use]
  pub fn matches(
    &self,
    title: &str,
    description: Option<&str>
  ) -> bool {
    title.to_lowercase().contains(&self.needle)
      || description.is_some_and(|text| {
        text.to_lowercase().contains(&self.needle)
      })
  }
}

#[must_use]
pub fn search_action(raw: &str) -> SearchAction {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return SearchAction::ShowAll;
  }
  if trimmed.chars().count() < MIN_QUERY_CHARS {
    return SearchAction::Keep;
  }
  SearchAction::Filter(SearchQuery {
    needle: trimmed.to_lowercase()
  })
}

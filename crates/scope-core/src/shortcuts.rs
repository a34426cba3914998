#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Shortcut {
  NewTask,
  NewProject,
  FocusSearch,
  CloseModals
}

/// Maps a `KeyboardEvent.key` value to a
/// shortcut.
///
/// `typing` is true while focus sits in an
/// input, textarea or contenteditable
/// element; only `Escape` fires then.
#[must_use]
pub fn shortcut_for_key(
  key: &str,
  typing: bool
) -> Option<Shortcut> {
  if key == "Escape" {
    return Some(Shortcut::CloseModals);
  }
  if typing {
    return None;
  }

  match key {
    | "n" => Some(Shortcut::NewTask),
    | "p" => Some(Shortcut::NewProject),
    | "/" => Some(Shortcut::FocusSearch),
    | _ => None
  }
}

/// Whether a focused element with this tag
/// name takes text input.
#[must_use]
pub fn is_text_entry(
  tag_name: &str,
  content_editable: bool
) -> bool {
  content_editable
    || tag_name.eq_ignore_ascii_case("input")
    || tag_name.eq_ignore_ascii_case("textarea")
}

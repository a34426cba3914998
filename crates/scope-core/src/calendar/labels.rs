use serde::{
  Deserialize,
  Serialize
};

/// UI language for calendar text.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
  #[default]
  En,
  Ru
}

impl Locale {
  #[must_use]
  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "en" | "english" => Some(Self::En),
      | "ru" | "russian" => Some(Self::Ru),
      | _ => None
    }
  }

  #[must_use]
  pub fn labels(
    self
  ) -> &'static CalendarLabels {
    match self {
      | Self::En => &EN,
      | Self::Ru => &RU
    }
  }
}

#[derive(Debug)]
pub struct CalendarLabels {
  pub month_names:          [&'static str; 12],
  pub month_names_genitive: [&'static str; 12],
  /// Monday first.
  pub weekday_short:        [&'static str; 7],
  pub today_button:         &'static str,
  pub agenda_prefix:        &'static str,
  pub agenda_empty:         &'static str,
  pub search_placeholder:   &'static str,
  pub new_task:             &'static str,
  pub new_project:          &'static str,
  pub new_tag:              &'static str,
  pub create_button:        &'static str,
  pub cancel_button:        &'static str,
  pub name_required:        &'static str
}

impl CalendarLabels {
  #[must_use]
  pub fn month_title(
    &self,
    year: i32,
    month: u32
  ) -> String {
    let name = self
      .month_names
      .get(month.saturating_sub(1) as usize)
      .copied()
      .unwrap_or("?");
    format!("{name} {year}")
  }

  /// "15 March" / "15 марта".
  #[must_use]
  pub fn display_day(
    &self,
    month: u32,
    day: u32
  ) -> String {
    let name = self
      .month_names_genitive
      .get(month.saturating_sub(1) as usize)
      .copied()
      .unwrap_or("?");
    format!("{day} {name}")
  }

  #[must_use]
  pub fn agenda_heading(
    &self,
    month: u32,
    day: u32
  ) -> String {
    format!(
      "{} {}",
      self.agenda_prefix,
      self.display_day(month, day)
    )
  }
}

static EN: CalendarLabels = CalendarLabels {
  month_names:          [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December"
  ],
  month_names_genitive: [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December"
  ],
  weekday_short:        [
    "Mon", "Tue", "Wed", "Thu", "Fri", "Sat",
    "Sun"
  ],
  today_button:         "Today",
  agenda_prefix:        "Tasks for",
  agenda_empty:         "No tasks for this day",
  search_placeholder:   "Search tasks",
  new_task:             "New task",
  new_project:          "New project",
  new_tag:              "New tag",
  create_button:        "Create",
  cancel_button:        "Cancel",
  name_required:        "Name is required"
};

static RU: CalendarLabels = CalendarLabels {
  month_names:          [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь"
  ],
  month_names_genitive: [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря"
  ],
  weekday_short:        [
    "Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"
  ],
  today_button:         "Сегодня",
  agenda_prefix:        "Задачи на",
  agenda_empty:         "Нет задач на этот день",
  search_placeholder:   "Поиск задач",
  new_task:             "Новая задача",
  new_project:          "Новый проект",
  new_tag:              "Новый тег",
  create_button:        "Создать",
  cancel_button:        "Отмена",
  name_required:        "Укажите название"
};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn agenda_heading_uses_genitive_month() {
    assert_eq!(
      Locale::Ru
        .labels()
        .agenda_heading(3, 15),
      "Задачи на 15 марта"
    );
    assert_eq!(
      Locale::En
        .labels()
        .agenda_heading(3, 15),
      "Tasks for 15 March"
    );
  }

  #[test]
  fn locale_keys_are_case_insensitive() {
    assert_eq!(
      Locale::from_key(" RU "),
      Some(Locale::Ru)
    );
    assert_eq!(Locale::from_key("de"), None);
  }
}

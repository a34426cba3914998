fn visible_entries<'a>(
  entries: &'a [AgendaEntry],
  query: Option<&SearchQuery>
) -> Vec<&'a AgendaEntry> {
  entries
    .iter()
    .filter(|entry| {
      query.is_none_or(|query| {
        query.matches(
          &entry.title,
          entry.description.as_deref()
        )
      })
    })
    .collect()
}

/// The message to show instead of the list:
/// the day's empty text when a search hides
/// every entry.
fn agenda_fallback<'a>(
  body: &'a AgendaBody,
  query: Option<&SearchQuery>,
  empty: &'a str
) -> Option<&'a str> {
  match body {
    | AgendaBody::Empty(message) => {
      Some(message.as_str())
    }
    | AgendaBody::Entries(entries) => {
      (query.is_some()
        && visible_entries(entries, query)
          .is_empty())
      .then_some(empty)
    }
  }
}

fn render_agenda(
  view: &CalendarView,
  query: Option<&SearchQuery>,
  labels: &'static CalendarLabels,
  search_ref: NodeRef,
  on_search_input: Callback<InputEvent>,
  on_toggle_entry: Callback<u64>
) -> Html {
  let fallback = agenda_fallback(
    &view.agenda.body,
    query,
    labels.agenda_empty
  );
  let body = match (&view.agenda.body, fallback) {
    | (AgendaBody::Entries(entries), None) => {
      html! {
          <ul class="calendar-task-list">
              {
                  for visible_entries(entries, query).into_iter().map(|entry| {
                      render_agenda_entry(entry, on_toggle_entry.clone())
                  })
              }
          </ul>
      }
    }
    | (_, message) => {
      html! { <div class="calendar-tasks-empty">{ message.unwrap_or_default().to_string() }</div> }
    }
  };

  html! {
      <section class="calendar-selected-day">
          <div class="calendar-selected-header">
              <h3 id="selectedDateTitle">{ view.agenda.heading.clone() }</h3>
              <input
                  ref={search_ref}
                  id="searchInput"
                  type="search"
                  class="calendar-search"
                  placeholder={labels.search_placeholder}
                  oninput={on_search_input}
              />
          </div>
          { body }
      </section>
  }
}

fn render_agenda_entry(
  entry: &AgendaEntry,
  on_toggle_entry: Callback<u64>
) -> Html {
  let style = format!(
    "border-left-color:{};",
    entry.color
  );
  let onchange = entry.id.map(|id| {
    Callback::from(move |_: web_sys::Event| {
      on_toggle_entry.emit(id)
    })
  });

  html! {
      <li class={classes!("calendar-task-item", entry.completed.then_some("completed"))} style={style}>
          <input
              type="checkbox"
              class="task-checkbox"
              checked={entry.completed}
              disabled={entry.id.is_none()}
              {onchange}
          />
          <a href={entry.url.clone()} class="calendar-task-link">
              {
                  if let Some(time) = &entry.time {
                      html! { <span class="calendar-task-time">{ time.clone() }</span> }
                  } else {
                      html! {}
                  }
              }
              <span class="calendar-task-title">{ entry.title.clone() }</span>
              {
                  if let Some(project) = &entry.project {
                      html! { <span class="calendar-task-project">{ project.clone() }</span> }
                  } else {
                      html! {}
                  }
              }
          </a>
      </li>
  }
}

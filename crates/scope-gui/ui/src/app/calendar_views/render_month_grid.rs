fn render_month_grid(
  view: &CalendarView,
  on_select_day: Callback<String>
) -> Html {
  html! {
      <>
          <div class="calendar-weekday-row">
              {
                  for view.weekday_labels.iter().map(|label| html! {
                      <div class="calendar-weekday">{ label.clone() }</div>
                  })
              }
          </div>
          <div class="calendar-grid calendar-month-grid">
              {
                  for view.grid.cells.iter().map(|cell| {
                      render_day_cell(cell, on_select_day.clone())
                  })
              }
          </div>
      </>
  }
}

/// Adjacent-month cells are inert.
fn render_day_cell(
  cell: &DayCell,
  on_select_day: Callback<String>
) -> Html {
  let outside = cell.kind != CellKind::Current;
  let onclick = cell.is_selectable().then(|| {
    let key = cell.date_key();
    Callback::from(move |_: MouseEvent| {
      on_select_day.emit(key.clone())
    })
  });

  html! {
      <button
          type="button"
          class={classes!(
              "calendar-day",
              outside.then_some("other-month"),
              cell.is_today.then_some("today"),
              cell.is_selected.then_some("selected"),
              (!cell.markers.is_empty()).then_some("has-tasks")
          )}
          disabled={outside}
          data-date={cell.date_key()}
          {onclick}
      >
          <span class="calendar-day-number">{ cell.day }</span>
          { render_day_markers(cell) }
      </button>
  }
}

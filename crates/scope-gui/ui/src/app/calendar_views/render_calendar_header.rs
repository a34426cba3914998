fn render_calendar_header(
  view: &CalendarView,
  labels: &'static CalendarLabels,
  on_prev: Callback<MouseEvent>,
  on_today: Callback<MouseEvent>,
  on_next: Callback<MouseEvent>,
  on_new_tag: Callback<MouseEvent>
) -> Html {
  html! {
      <div class="calendar-header">
          <h2 class="calendar-title">{ view.title.clone() }</h2>
          <div class="actions calendar-nav-actions">
              <button type="button" class="btn" onclick={on_prev}>{ "‹" }</button>
              <button type="button" class="btn" onclick={on_today}>{ view.today_label.clone() }</button>
              <button type="button" class="btn" onclick={on_next}>{ "›" }</button>
              <button type="button" class="btn btn-secondary" onclick={on_new_tag}>{ labels.new_tag }</button>
          </div>
      </div>
  }
}

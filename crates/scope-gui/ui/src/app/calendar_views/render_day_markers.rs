fn render_day_markers(
  cell: &DayCell
) -> Html {
  if cell.markers.is_empty() {
    return html! {};
  }

  html! {
      <div class="calendar-day-events">
          {
              for cell.markers.iter().map(|marker| html! {
                  <span
                      class={classes!("calendar-event-dot", marker.completed.then_some("completed"))}
                      style={marker_style(marker)}
                  ></span>
              })
          }
          {
              if cell.overflow > 0 {
                  html! { <span class="calendar-event-more">{ format!("+{}", cell.overflow) }</span> }
              } else {
                  html! {}
              }
          }
      </div>
  }
}

fn marker_style(
  marker: &EventMarker
) -> String {
  format!(
    "background-color:{};",
    marker.color
  )
}

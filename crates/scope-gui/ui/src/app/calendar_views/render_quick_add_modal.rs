#[allow(clippy::too_many_arguments)]
fn render_quick_add_modal(
  state: Option<&ModalState>,
  busy: bool,
  labels: &'static CalendarLabels,
  name_ref: NodeRef,
  on_draft_name: Callback<InputEvent>,
  on_draft_color: Callback<InputEvent>,
  on_submit: Callback<SubmitEvent>,
  on_close: Callback<MouseEvent>
) -> Html {
  let Some(state) = state else {
    return html! {};
  };

  let title = match state.kind {
    | ModalKind::Task => labels.new_task,
    | ModalKind::Project => labels.new_project,
    | ModalKind::Tag => labels.new_tag
  };

  html! {
      <div class="modal-overlay active">
          <form class="modal" onsubmit={on_submit}>
              <h3 class="modal-title">{ title }</h3>
              <input
                  ref={name_ref}
                  type="text"
                  name="title"
                  class="form-input"
                  value={state.draft_name.clone()}
                  oninput={on_draft_name}
              />
              {
                  if state.kind != ModalKind::Task {
                      html! {
                          <input
                              type="text"
                              name="color"
                              class="form-input color-hex"
                              value={state.draft_color.clone()}
                              oninput={on_draft_color}
                          />
                      }
                  } else {
                      html! {}
                  }
              }
              {
                  if let Some(error) = &state.error {
                      html! { <div class="form-error">{ error.clone() }</div> }
                  } else {
                      html! {}
                  }
              }
              <div class="modal-actions">
                  <button type="button" class="btn" onclick={on_close}>{ labels.cancel_button }</button>
                  <button type="submit" class="btn btn-primary" disabled={busy}>{ labels.create_button }</button>
              </div>
          </form>
      </div>
  }
}

use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::future::TimeoutFuture;
use scope_core::calendar::event::DEFAULT_EVENT_COLOR;
use scope_core::calendar::labels::CalendarLabels;
use scope_core::calendar::{
  AgendaBody,
  AgendaEntry,
  CalendarController,
  CalendarSession,
  CalendarView,
  CellKind,
  DayCell,
  EventMarker
};
use scope_core::config::Config;
use scope_core::datetime::SystemClock;
use scope_core::filter::{
  SearchAction,
  SearchQuery,
  search_action
};
use scope_core::shortcuts::{
  Shortcut,
  is_text_entry,
  shortcut_for_key
};
use scope_core::tasks::{
  MutationResult,
  TaskMutation
};
use scope_shared::{
  ProjectCreated,
  TagCreated,
  TaskCreated,
  TaskToggled
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlElement,
  HtmlInputElement,
  InputEvent,
  KeyboardEvent,
  MouseEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  NodeRef,
  TargetCast,
  UseStateHandle,
  classes,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_mut_ref,
  use_node_ref,
  use_state
};

use crate::api::{
  GlooEventSource,
  TaskApi,
  page_origin
};

const EMBEDDED_CONFIG: &str =
  include_str!("../calendar.toml");
const SEARCH_DEBOUNCE_MS: u32 = 300;

type Session =
  CalendarSession<GlooEventSource, SystemClock>;
type SharedSession = Rc<Option<Session>>;

/// Renders the calendar widget into
/// `container`, replacing its children.
pub fn mount_calendar(container: Element) {
  yew::Renderer::<CalendarApp>::with_root(
    container
  )
  .render();
}

fn load_config() -> Config {
  let mut config =
    match Config::from_toml_str(EMBEDDED_CONFIG)
    {
      | Ok(config) => config,
      | Err(err) => {
        tracing::error!(
          error = %err,
          "embedded calendar.toml rejected; \
           using defaults"
        );
        Config::default()
      }
    };

  if let Some(origin) = page_origin() {
    config.server.base_url = origin;
  }
  config
}

fn build_session(
  config: &Config
) -> Option<Session> {
  match GlooEventSource::new(&config.server) {
    | Ok(source) => {
      let controller = CalendarController::new(
        config.clock(),
        config.controller_options()
      );
      Some(CalendarSession::new(
        source, controller
      ))
    }
    | Err(err) => {
      tracing::error!(
        error = %err,
        "calendar event source unavailable"
      );
      None
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Navigation {
  Initialize,
  Previous,
  Next,
  Today,
  Reload
}

fn navigate(
  session: SharedSession,
  view: UseStateHandle<Option<CalendarView>>,
  navigation: Navigation
) {
  wasm_bindgen_futures::spawn_local(
    async move {
      let Some(active) = Option::as_ref(&session)
      else {
        return;
      };

      tracing::debug!(?navigation, "calendar navigation");
      let next = match navigation {
        | Navigation::Initialize => {
          active.initialize().await
        }
        | Navigation::Previous => {
          active.go_to_previous_month().await
        }
        | Navigation::Next => {
          active.go_to_next_month().await
        }
        | Navigation::Today => {
          active.go_to_today().await
        }
        | Navigation::Reload => {
          active.reload().await
        }
      };
      view.set(Some(next));
    }
  );
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ModalKind {
  Task,
  Project,
  Tag
}

#[derive(Clone, PartialEq, Debug)]
struct ModalState {
  kind:        ModalKind,
  draft_name:  String,
  draft_color: String,
  error:       Option<String>
}

impl ModalState {
  fn open(kind: ModalKind) -> Self {
    Self {
      kind,
      draft_name: String::new(),
      draft_color: DEFAULT_EVENT_COLOR
        .to_string(),
      error: None
    }
  }

  /// `None` while the name is blank.
  fn mutation(&self) -> Option<TaskMutation> {
    match self.kind {
      | ModalKind::Task => {
        TaskMutation::create_task(
          &self.draft_name,
          None
        )
      }
      | ModalKind::Project => {
        TaskMutation::create_project(
          &self.draft_name,
          &self.draft_color
        )
      }
      | ModalKind::Tag => {
        TaskMutation::create_tag(
          &self.draft_name,
          &self.draft_color
        )
      }
    }
  }

  fn with_error(
    self,
    error: impl Into<String>
  ) -> Self {
    Self {
      error: Some(error.into()),
      ..self
    }
  }
}

fn focus_is_typing() -> bool {
  web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| {
      document.active_element()
    })
    .is_some_and(|element| {
      let editable = element
        .dyn_ref::<HtmlElement>()
        .is_some_and(
          HtmlElement::is_content_editable
        );
      is_text_entry(
        &element.tag_name(),
        editable
      )
    })
}

fn focus_input(node: &NodeRef) {
  if let Some(input) =
    node.cast::<HtmlInputElement>()
    && let Err(err) = input.focus()
  {
    tracing::debug!(?err, "input focus failed");
  }
}

#[function_component(CalendarApp)]
fn calendar_app() -> Html {
  let config = use_memo((), |_| load_config());
  let labels: &'static CalendarLabels =
    config.locale().labels();
  let session = {
    let config = config.clone();
    use_memo((), move |_| {
      build_session(&config)
    })
  };
  let api = {
    let config = config.clone();
    use_memo((), move |_| {
      TaskApi::new(&config.server)
    })
  };

  let view = {
    let session = session.clone();
    use_state(move || {
      Option::as_ref(&session)
        .map(Session::render)
    })
  };
  let search_query =
    use_state(|| None::<SearchQuery>);
  let search_seq = use_mut_ref(|| 0_u64);
  let notice = use_state(|| None::<String>);
  let modal = use_state(|| None::<ModalState>);
  let modal_busy = use_state(|| false);
  let search_ref = use_node_ref();
  let name_ref = use_node_ref();

  {
    let session = session.clone();
    let view = view.clone();
    use_effect_with((), move |_| {
      navigate(
        session,
        view,
        Navigation::Initialize
      );
      || ()
    });
  }

  {
    let modal = modal.clone();
    let search_ref = search_ref.clone();
    use_effect_with((), move |_| {
      let listener = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| {
          EventListener::new(
            &document,
            "keydown",
            move |event| {
              let Some(event) =
                event.dyn_ref::<KeyboardEvent>()
              else {
                return;
              };
              let shortcut = shortcut_for_key(
                &event.key(),
                focus_is_typing()
              );
              match shortcut {
                | Some(Shortcut::NewTask) => {
                  event.prevent_default();
                  modal.set(Some(
                    ModalState::open(
                      ModalKind::Task
                    )
                  ));
                }
                | Some(Shortcut::NewProject) => {
                  event.prevent_default();
                  modal.set(Some(
                    ModalState::open(
                      ModalKind::Project
                    )
                  ));
                }
                | Some(Shortcut::FocusSearch) => {
                  event.prevent_default();
                  focus_input(&search_ref);
                }
                | Some(Shortcut::CloseModals) => {
                  modal.set(None);
                }
                | None => {}
              }
            }
          )
        });
      tracing::debug!(
        attached = listener.is_some(),
        "keyboard shortcuts"
      );
      move || drop(listener)
    });
  }

  {
    let name_ref = name_ref.clone();
    use_effect_with(
      (*modal).as_ref().map(|state| state.kind),
      move |kind| {
        if kind.is_some() {
          focus_input(&name_ref);
        }
        || ()
      }
    );
  }

  let on_prev = {
    let session = session.clone();
    let view = view.clone();
    Callback::from(move |_: MouseEvent| {
      navigate(
        session.clone(),
        view.clone(),
        Navigation::Previous
      );
    })
  };
  let on_next = {
    let session = session.clone();
    let view = view.clone();
    Callback::from(move |_: MouseEvent| {
      navigate(
        session.clone(),
        view.clone(),
        Navigation::Next
      );
    })
  };
  let on_today = {
    let session = session.clone();
    let view = view.clone();
    Callback::from(move |_: MouseEvent| {
      navigate(
        session.clone(),
        view.clone(),
        Navigation::Today
      );
    })
  };

  let on_select_day = {
    let session = session.clone();
    let view = view.clone();
    Callback::from(move |key: String| {
      let Some(active) = Option::as_ref(&session)
      else {
        return;
      };
      match active.select_date(&key) {
        | Ok(next) => view.set(Some(next)),
        | Err(err) => {
          tracing::warn!(
            error = %err,
            "day selection rejected"
          );
        }
      }
    })
  };

  let on_search_input = {
    let search_query = search_query.clone();
    let search_seq = search_seq.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      let raw = input.value();
      let ticket = {
        let mut seq = search_seq.borrow_mut();
        *seq += 1;
        *seq
      };

      let search_query = search_query.clone();
      let search_seq = search_seq.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          TimeoutFuture::new(SEARCH_DEBOUNCE_MS)
            .await;
          if *search_seq.borrow() != ticket {
            return;
          }
          match search_action(&raw) {
            | SearchAction::ShowAll => {
              search_query.set(None)
            }
            | SearchAction::Keep => {}
            | SearchAction::Filter(query) => {
              tracing::debug!(
                needle = query.needle(),
                "filtering agenda"
              );
              search_query.set(Some(query));
            }
          }
        }
      );
    })
  };

  let on_toggle_entry = {
    let api = api.clone();
    let session = session.clone();
    let view = view.clone();
    let notice = notice.clone();
    Callback::from(move |task: u64| {
      let api = api.clone();
      let session = session.clone();
      let view = view.clone();
      let notice = notice.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let mutation =
            TaskMutation::ToggleTask { task };
          match api
            .send::<TaskToggled>(&mutation)
            .await
          {
            | MutationResult::Success(toggled) => {
              tracing::info!(
                task,
                completed = toggled.is_completed,
                "task toggled"
              );
              notice.set(None);
              navigate(
                session,
                view,
                Navigation::Reload
              );
            }
            | MutationResult::Failure {
              reason
            } => {
              tracing::warn!(
                task,
                %reason,
                "task toggle failed"
              );
              notice.set(Some(reason));
            }
          }
        }
      );
    })
  };

  let on_new_tag = {
    let modal = modal.clone();
    Callback::from(move |_: MouseEvent| {
      modal.set(Some(ModalState::open(
        ModalKind::Tag
      )));
    })
  };

  let on_modal_close = {
    let modal = modal.clone();
    Callback::from(move |_: MouseEvent| {
      modal.set(None);
    })
  };

  let on_modal_submit = {
    let api = api.clone();
    let session = session.clone();
    let view = view.clone();
    let modal = modal.clone();
    let modal_busy = modal_busy.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if *modal_busy {
        return;
      }
      let Some(state) = (*modal).clone() else {
        return;
      };
      let Some(mutation) = state.mutation()
      else {
        modal.set(Some(
          state.with_error(labels.name_required)
        ));
        return;
      };

      modal_busy.set(true);
      let api = api.clone();
      let session = session.clone();
      let view = view.clone();
      let modal = modal.clone();
      let modal_busy = modal_busy.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = match state.kind {
            | ModalKind::Task => {
              api
                .send::<TaskCreated>(&mutation)
                .await
                .into_result()
                .map(|created| {
                  tracing::info!(
                    id = created.id,
                    "task created"
                  );
                })
            }
            | ModalKind::Project => {
              api
                .send::<ProjectCreated>(&mutation)
                .await
                .into_result()
                .map(|created| {
                  tracing::info!(
                    id = created.id,
                    "project created"
                  );
                })
            }
            | ModalKind::Tag => {
              api
                .send::<TagCreated>(&mutation)
                .await
                .into_result()
                .map(|created| {
                  tracing::info!(
                    id = created.id,
                    color = %created.color,
                    "tag created"
                  );
                })
            }
          };
          modal_busy.set(false);

          match outcome {
            | Ok(()) => {
              modal.set(None);
              if state.kind == ModalKind::Task {
                navigate(
                  session,
                  view,
                  Navigation::Reload
                );
              }
            }
            | Err(reason) => {
              modal.set(Some(
                state.with_error(reason)
              ));
            }
          }
        }
      );
    })
  };

  let on_draft_name = {
    let modal = modal.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      if let Some(state) = (*modal).clone() {
        modal.set(Some(ModalState {
          draft_name: input.value(),
          ..state
        }));
      }
    })
  };
  let on_draft_color = {
    let modal = modal.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      if let Some(state) = (*modal).clone() {
        modal.set(Some(ModalState {
          draft_color: input.value(),
          ..state
        }));
      }
    })
  };

  let Some(current) = (*view).clone() else {
    return html! {
        <div class="calendar-container calendar-unavailable">
            { "Calendar unavailable" }
        </div>
    };
  };

  html! {
      <div class="calendar-container">
          { render_calendar_header(&current, labels, on_prev, on_today, on_next, on_new_tag) }
          { render_month_grid(&current, on_select_day) }
          {
              if let Some(message) = (*notice).clone() {
                  html! { <div class="calendar-notice">{ message }</div> }
              } else {
                  html! {}
              }
          }
          {
              render_agenda(
                  &current,
                  (*search_query).as_ref(),
                  labels,
                  search_ref,
                  on_search_input,
                  on_toggle_entry,
              )
          }
          {
              render_quick_add_modal(
                  (*modal).as_ref(),
                  *modal_busy,
                  labels,
                  name_ref,
                  on_draft_name,
                  on_draft_color,
                  on_modal_submit,
                  on_modal_close,
              )
          }
      </div>
  }
}

include!("app/calendar_views/render_calendar_header.rs");
include!("app/calendar_views/render_month_grid.rs");
include!("app/calendar_views/render_day_markers.rs");
include!("app/calendar_views/render_agenda.rs");
include!("app/calendar_views/render_quick_add_modal.rs");

#[cfg(test)]
mod tests {
  use scope_core::calendar::{
    CalendarEvent,
    ControllerOptions
  };
  use scope_core::datetime::FixedClock;

  use super::*;

  fn sample_view() -> CalendarView {
    let day = scope_core::datetime::parse_date_key(
      "2024-03-15"
    )
    .expect("valid key");
    let mut controller = CalendarController::new(
      FixedClock(day),
      ControllerOptions::default()
    );
    let request = controller.initialize();
    let mut described = CalendarEvent::new(
      day,
      "Quarterly",
      "/tasks/2/",
      "#3B82F6",
      false
    );
    described.description =
      Some("draft the report".to_string());
    controller.complete_fetch(
      &request,
      Ok(vec![
        CalendarEvent::new(
          day,
          "Pay rent",
          "/tasks/1/",
          "#EF4444",
          true
        ),
        described,
      ])
    );
    controller.render()
  }

  fn query(raw: &str) -> SearchQuery {
    match search_action(raw) {
      | SearchAction::Filter(query) => query,
      | other => {
        panic!("expected filter, got {other:?}")
      }
    }
  }

  #[test]
  fn search_filters_agenda_by_description() {
    let view = sample_view();
    let entries = view.agenda.entries();

    assert_eq!(visible_entries(entries, None).len(), 2);

    let needle = query("report");
    let shown =
      visible_entries(entries, Some(&needle));
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Quarterly");
  }

  #[test]
  fn marker_style_uses_event_color() {
    let marker = EventMarker {
      color:     "#EF4444".to_string(),
      completed: false
    };
    assert_eq!(
      marker_style(&marker),
      "background-color:#EF4444;"
    );
  }

  #[test]
  fn blank_modal_name_sends_nothing() {
    let state = ModalState::open(ModalKind::Task);
    assert_eq!(state.mutation(), None);

    let project = ModalState {
      draft_name: "Home".to_string(),
      draft_color: "#10b981".to_string(),
      ..ModalState::open(ModalKind::Project)
    };
    assert_eq!(
      project.mutation(),
      Some(TaskMutation::CreateProject {
        name:  "Home".to_string(),
        color: "#10B981".to_string()
      })
    );

    let tag = ModalState {
      draft_name: "urgent".to_string(),
      draft_color: "not a color".to_string(),
      ..ModalState::open(ModalKind::Tag)
    };
    assert_eq!(
      tag.mutation(),
      Some(TaskMutation::CreateTag {
        name:  "urgent".to_string(),
        color: DEFAULT_EVENT_COLOR.to_string()
      })
    );
  }

  #[test]
  fn search_without_matches_shows_empty_message() {
    let view = sample_view();
    let entries = view.agenda.entries();
    let needle = query("dentist");
    assert!(
      visible_entries(entries, Some(&needle))
        .is_empty()
    );
    assert_eq!(
      agenda_fallback(&view.agenda.body, Some(&needle), "none"),
      Some("none")
    );
    assert_eq!(
      agenda_fallback(&view.agenda.body, None, "none"),
      None
    );
  }
}

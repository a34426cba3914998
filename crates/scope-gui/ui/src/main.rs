mod api;
mod app;

const MOUNT_ID: &str = "calendar";

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting Scope calendar frontend"
  );

  let mount = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.get_element_by_id(MOUNT_ID)
    });

  match mount {
    | Some(container) => {
      app::mount_calendar(container)
    }
    | None => {
      tracing::error!(
        id = MOUNT_ID,
        "calendar container not found; \
         nothing to mount"
      );
    }
  }
}

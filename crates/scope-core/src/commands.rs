use std::future::Future;

use anyhow::{Context, anyhow};
use scope_shared::{
    Acknowledged, ChecklistItemAdded, ChecklistItemDeleted, ChecklistItemToggled, ProjectCreated,
    TagCreated, TaskCreated, TaskToggled,
};
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::calendar::{CalendarController, CalendarSession};
use crate::cli::{
    CalendarArgs, ChecklistCommand, Command, ProjectCommand, TagCommand, TaskCommand,
};
use crate::config::Config;
use crate::http::{HttpEventSource, HttpTaskClient};
use crate::render::Renderer;
use crate::tasks::TaskMutation;

#[instrument(skip(cfg, renderer, command))]
pub fn dispatch(cfg: &Config, renderer: &mut Renderer, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Calendar(args) => block_on(cmd_calendar(cfg, renderer, args)),
        Command::Task(task) => block_on(cmd_task(cfg, renderer, task)),
        Command::Checklist(item) => block_on(cmd_checklist(cfg, renderer, item)),
        Command::Project(project) => block_on(cmd_project(cfg, renderer, project)),
        Command::Tag(tag) => block_on(cmd_tag(cfg, renderer, tag)),
    }
}

fn block_on<F: Future<Output = anyhow::Result<()>>>(future: F) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(future)
}

#[instrument(skip(cfg, renderer, args))]
async fn cmd_calendar(
    cfg: &Config,
    renderer: &mut Renderer,
    args: CalendarArgs,
) -> anyhow::Result<()> {
    let source = HttpEventSource::new(&cfg.server)?;
    let controller = CalendarController::new(cfg.clock(), cfg.controller_options());
    let session = CalendarSession::new(source, controller);

    let mut view = match args.month {
        Some(month) => session.go_to_month(month).await,
        None => session.initialize().await,
    };

    if let Some(raw) = args.select.as_deref() {
        match session.select_date(raw) {
            Ok(selected) => view = selected,
            Err(err) => warn!(error = %err, "ignoring --select"),
        }
    }

    renderer.print_calendar(&view)
}

#[instrument(skip(cfg, renderer, command))]
async fn cmd_task(
    cfg: &Config,
    renderer: &mut Renderer,
    command: TaskCommand,
) -> anyhow::Result<()> {
    let client = HttpTaskClient::new(&cfg.server)?;
    match command {
        TaskCommand::Toggle { id } => {
            let toggled: TaskToggled = send(&client, TaskMutation::ToggleTask { task: id }).await?;
            let state = if toggled.is_completed {
                "completed"
            } else {
                "pending"
            };
            renderer.print_line(&format!("Task {id} is now {state}."))
        }
        TaskCommand::Delete { id } => {
            let _: Acknowledged = send(&client, TaskMutation::DeleteTask { task: id }).await?;
            renderer.print_line(&format!("Deleted task {id}."))
        }
        TaskCommand::Add { title, project } => {
            let mutation = TaskMutation::create_task(&title, project)
                .ok_or_else(|| anyhow!("task title must not be empty"))?;
            let created: TaskCreated = send(&client, mutation).await?;
            renderer.print_line(&format!("Created task {} '{}'.", created.id, created.title))
        }
    }
}

#[instrument(skip(cfg, renderer, command))]
async fn cmd_checklist(
    cfg: &Config,
    renderer: &mut Renderer,
    command: ChecklistCommand,
) -> anyhow::Result<()> {
    let client = HttpTaskClient::new(&cfg.server)?;
    match command {
        ChecklistCommand::Add { task, text } => {
            let mutation = TaskMutation::add_checklist_item(task, &text)
                .ok_or_else(|| anyhow!("checklist text must not be empty"))?;
            let added: ChecklistItemAdded = send(&client, mutation).await?;
            renderer.print_line(&format!(
                "Added checklist item {} to task {task}: {}",
                added.id, added.text
            ))
        }
        ChecklistCommand::Toggle { id } => {
            let toggled: ChecklistItemToggled =
                send(&client, TaskMutation::ToggleChecklistItem { item: id }).await?;
            let mark = if toggled.is_completed { "x" } else { " " };
            let progress = toggled
                .progress
                .map(|progress| format!(" ({} done)", progress.label()))
                .unwrap_or_default();
            renderer.print_line(&format!("[{mark}] checklist item {id}{progress}"))
        }
        ChecklistCommand::Delete { id } => {
            let deleted: ChecklistItemDeleted =
                send(&client, TaskMutation::DeleteChecklistItem { item: id }).await?;
            let progress = deleted
                .progress
                .map(|progress| format!(" ({} done)", progress.label()))
                .unwrap_or_default();
            renderer.print_line(&format!("Deleted checklist item {id}{progress}."))
        }
    }
}

#[instrument(skip(cfg, renderer, command))]
async fn cmd_project(
    cfg: &Config,
    renderer: &mut Renderer,
    command: ProjectCommand,
) -> anyhow::Result<()> {
    let client = HttpTaskClient::new(&cfg.server)?;
    match command {
        ProjectCommand::Add { name, color } => {
            let mutation = TaskMutation::create_project(&name, &color)
                .ok_or_else(|| anyhow!("project name must not be empty"))?;
            let created: ProjectCreated = send(&client, mutation).await?;
            renderer.print_line(&format!("Created project {} '{}'.", created.id, created.name))
        }
        ProjectCommand::Delete { id } => {
            let _: Acknowledged =
                send(&client, TaskMutation::DeleteProject { project: id }).await?;
            renderer.print_line(&format!("Deleted project {id}."))
        }
    }
}

#[instrument(skip(cfg, renderer, command))]
async fn cmd_tag(cfg: &Config, renderer: &mut Renderer, command: TagCommand) -> anyhow::Result<()> {
    let client = HttpTaskClient::new(&cfg.server)?;
    match command {
        TagCommand::Add { name, color } => {
            let mutation = TaskMutation::create_tag(&name, &color)
                .ok_or_else(|| anyhow!("tag name must not be empty"))?;
            let created: TagCreated = send(&client, mutation).await?;
            renderer.print_line(&format!(
                "Created tag {} '{}' ({}).",
                created.id, created.name, created.color
            ))
        }
        TagCommand::Delete { id } => {
            let _: Acknowledged = send(&client, TaskMutation::DeleteTag { tag: id }).await?;
            renderer.print_line(&format!("Deleted tag {id}."))
        }
    }
}

async fn send<T: DeserializeOwned>(
    client: &HttpTaskClient,
    mutation: TaskMutation,
) -> anyhow::Result<T> {
    let name = mutation.name();
    let payload = client
        .send::<T>(&mutation)
        .await
        .into_result()
        .map_err(|reason| anyhow!("{name} failed: {reason}"))?;
    info!(mutation = name, "mutation applied");
    Ok(payload)
}

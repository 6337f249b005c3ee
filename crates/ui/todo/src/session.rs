//! One command invocation: open the stores, enter the screen(s) the command
//! needs, save their snapshots.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use app::AppConfig;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use engine::{
    Controller, Deferred, EffectHandlers, Executor, Logic, LoopStatus, Observer, Serial,
};
use screens::add_edit::{AddEditTaskEvent, AddEditTaskHandlers, AddEditTaskLogic, AddEditTaskModel};
use screens::statistics::{StatisticsHandlers, StatisticsLogic, StatisticsState};
use screens::task_detail::{
    TaskDetailEvent, TaskDetailHandlers, TaskDetailLogic, TaskDetailViewData,
};
use screens::tasks_list::{
    TasksFilter, TasksListEvent, TasksListHandlers, TasksListLogic, TasksListModel,
    TasksListViewData,
};
use screens::{Persisted, Snapshot, Stores};
use tasks::{LocalTaskStore, SimulatedRemote, Task, TaskStore};
use tracing::{debug, info, warn};

use crate::cli::Cmd;
use crate::console::{Console, Latest};

pub const LOCAL_TASKS_FILE: &str = "tasks.json";
pub const REMOTE_TASKS_FILE: &str = "remote.json";
pub const SCREENS_DIR: &str = "screens";

pub struct Session {
    stores: Stores,
    local: Arc<LocalTaskStore>,
    screens_dir: PathBuf,
    ui: Arc<dyn Executor>,
    console: Arc<Console>,
}

impl Session {
    /// Open the stores below `config.data_dir`. The remote is seeded with
    /// sample tasks when its file is first created.
    pub async fn open(config: &AppConfig, console: Arc<Console>) -> Result<Self> {
        let data_dir = &config.data_dir;
        let local = Arc::new(
            LocalTaskStore::open(data_dir.join(LOCAL_TASKS_FILE))
                .wrap_err("opening local task store")?,
        );
        let remote =
            SimulatedRemote::open(data_dir.join(REMOTE_TASKS_FILE), config.remote_latency())
                .await
                .wrap_err("opening remote task store")?;
        remote.set_failing(config.remote_failing);

        Ok(Self {
            stores: Stores::new(Arc::new(remote), local.clone()),
            local,
            screens_dir: data_dir.join(SCREENS_DIR),
            ui: Arc::new(Serial::current()?),
            console,
        })
    }

    pub async fn run(&self, cmd: Cmd) -> Result<()> {
        debug!(?cmd, "running command");
        match cmd {
            Cmd::List { filter, refresh } => self.list(filter, refresh).await,
            Cmd::Add { title, description } => self.add(title, description).await,
            Cmd::Edit {
                id,
                title,
                description,
            } => self.edit(&id, title, description).await,
            Cmd::Complete { id } => {
                self.toggle(&id, TasksListEvent::TaskMarkedComplete(id.clone()))
                    .await
            }
            Cmd::Activate { id } => {
                self.toggle(&id, TasksListEvent::TaskMarkedActive(id.clone()))
                    .await
            }
            Cmd::ClearCompleted => {
                self.tasks_list(vec![TasksListEvent::ClearCompletedTasksRequested], None)
                    .await
            }
            Cmd::Show { id } => self.task_detail(&id, None).await,
            Cmd::Delete { id } => {
                self.task_detail(&id, Some(TaskDetailEvent::DeleteTaskRequested))
                    .await
            }
            Cmd::Stats => self.statistics().await,
        }
    }

    async fn list(&self, filter: Option<TasksFilter>, refresh: bool) -> Result<()> {
        let mut events = Vec::new();
        if let Some(filter) = filter {
            events.push(TasksListEvent::FilterSelected(filter));
        }
        if refresh {
            events.push(TasksListEvent::RefreshRequested);
        }
        self.tasks_list(events, None).await
    }

    /// The id is checked against the list once it has loaded.
    async fn toggle(&self, id: &str, event: TasksListEvent) -> Result<()> {
        let id = id.to_owned();
        self.tasks_list_with(None, move |model| match model.find_task(&id) {
            Ok(_) => Ok(vec![event]),
            Err(_) => bail!("no task with id {id}"),
        })
        .await
    }

    async fn tasks_list(
        &self,
        events: Vec<TasksListEvent>,
        source: Option<Arc<Deferred<TasksListEvent>>>,
    ) -> Result<()> {
        self.tasks_list_with(source, move |_| Ok(events)).await
    }

    async fn tasks_list_with(
        &self,
        source: Option<Arc<Deferred<TasksListEvent>>>,
        plan: impl FnOnce(&TasksListModel) -> Result<Vec<TasksListEvent>>,
    ) -> Result<()> {
        let model = self.restore::<TasksListModel>().unwrap_or_default();
        let handlers =
            TasksListHandlers::new(self.stores.clone(), self.console.clone(), self.ui.clone());
        let mut controller = Controller::new(TasksListLogic, handlers, model);
        if let Some(source) = source {
            controller = controller.with_event_source(source);
        }
        let view = Latest::new(|model: &TasksListModel| TasksListViewData::from(model));
        self.enter(controller, view.clone(), plan).await?;
        if let Some(view) = view.take() {
            self.console.print_tasks(&view);
        }
        Ok(())
    }

    async fn add(&self, title: String, description: String) -> Result<()> {
        self.add_edit(AddEditTaskModel::add(), title, description).await?;
        if self.console.take_exit() == Some(true) {
            let created = Arc::new(Deferred::new());
            created.inject(TasksListEvent::TaskCreated);
            self.tasks_list(Vec::new(), Some(created)).await?;
        }
        Ok(())
    }

    async fn edit(&self, id: &str, title: Option<String>, description: Option<String>) -> Result<()> {
        let task = self.find_task(id).await?;
        let title = title.unwrap_or_else(|| task.title().to_owned());
        let description = description.unwrap_or_else(|| task.description().to_owned());
        self.add_edit(AddEditTaskModel::edit(&task), title, description)
            .await?;
        if self.console.take_exit() == Some(true) {
            self.console.line("Task updated");
        }
        Ok(())
    }

    async fn add_edit(&self, model: AddEditTaskModel, title: String, description: String) -> Result<()> {
        let handlers =
            AddEditTaskHandlers::new(self.stores.clone(), self.console.clone(), self.ui.clone());
        let controller = Controller::new(AddEditTaskLogic, handlers, model);
        let view: Latest<AddEditTaskModel, ()> = Latest::new(|_| ());
        let event = AddEditTaskEvent::definition_completed(title, description);
        self.enter(controller, view, move |_| Ok(vec![event])).await?;
        Ok(())
    }

    async fn task_detail(&self, id: &str, event: Option<TaskDetailEvent>) -> Result<()> {
        let task = self.find_task(id).await?;
        let handlers =
            TaskDetailHandlers::new(self.stores.clone(), self.console.clone(), self.ui.clone());
        let controller = Controller::new(TaskDetailLogic, handlers, task);
        let view = Latest::new(|task: &Task| TaskDetailViewData::from(task));
        let deleting = event.is_some();
        self.enter(controller, view.clone(), move |_| Ok(event.into_iter().collect()))
            .await?;
        if !deleting {
            if let Some(view) = view.take() {
                self.console.print_task(&view);
            }
        }
        Ok(())
    }

    async fn statistics(&self) -> Result<()> {
        // counts are recomputed on every visit; the snapshot is only written
        let state = StatisticsState::default();
        let handlers = StatisticsHandlers::new(self.stores.local.clone());
        let controller = Controller::new(StatisticsLogic, handlers, state);
        let view = Latest::new(|state: &StatisticsState| state.clone());
        self.enter(controller, view.clone(), |_| Ok(Vec::new())).await?;
        if let Some(state) = view.take() {
            self.console.print_statistics(&state);
        }
        Ok(())
    }

    /// Run one screen: start, wait for the initial effects, feed the events
    /// `plan` derives from the settled model one by one, stop and persist
    /// the final model.
    async fn enter<L, H>(
        &self,
        mut controller: Controller<L, H>,
        view: impl Observer<L::Model, L::Event>,
        plan: impl FnOnce(&L::Model) -> Result<Vec<L::Event>>,
    ) -> Result<L::Model>
    where
        L: Logic,
        L::Model: Persisted,
        H: EffectHandlers<Effect = L::Effect, Event = L::Event>,
    {
        controller = controller.with_ui_executor(self.ui.clone());
        controller.connect(view)?;
        controller.start()?;
        controller.settled().await;

        let planned = match plan(&controller.model()) {
            Ok(events) => {
                for event in events {
                    controller.dispatch(event);
                    controller.settled().await;
                }
                Ok(())
            }
            Err(e) => Err(e),
        };

        let model = controller.stop()?;
        self.save(&model);
        planned?;
        if let LoopStatus::Failed(reason) = controller.status() {
            bail!("screen {} failed: {reason}", L::Model::SCREEN);
        }
        Ok(model)
    }

    async fn find_task(&self, id: &str) -> Result<Task> {
        match self.local.task(id).await? {
            Some(task) => Ok(task),
            None => bail!("no task with id {id}"),
        }
    }

    fn snapshot_file(&self, screen: &str) -> PathBuf {
        self.screens_dir.join(format!("{screen}.json"))
    }

    /// A snapshot that cannot be read is logged and ignored.
    fn restore<M: Persisted>(&self) -> Option<M> {
        let file = self.snapshot_file(M::SCREEN);
        match Snapshot::read_from(&file).and_then(|s| s.map(|s| M::restore(&s)).transpose()) {
            Ok(model) => model,
            Err(e) => {
                warn!(file = %file.display(), error = %e, "ignoring unreadable snapshot");
                None
            }
        }
    }

    fn save<M: Persisted>(&self, model: &M) {
        let file = self.snapshot_file(M::SCREEN);
        if let Err(e) = model.save().and_then(|s| s.write_to(&file)) {
            warn!(file = %file.display(), error = %e, "saving snapshot failed");
        } else {
            info!(screen = M::SCREEN, "snapshot saved");
        }
    }

    pub fn screens_dir(&self) -> &Path {
        &self.screens_dir
    }
}

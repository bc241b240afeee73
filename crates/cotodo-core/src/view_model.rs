//! List/Task View-Model
//!
//! Keeps a live view of one list: subscribes to the list record and to every
//! task in its membership set, recomputes on every push, and turns user
//! intents into engine mutations.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{list, task, AccountId, Entity, ListId, RecordKind, Role, Task, TaskId, TodoList};
use crate::error::{ActionError, ActionResult, EngineError};
use crate::observer::{Listener, Observers, Subscription};
use crate::session::Session;

const EMPTY_INPUT: &str = "Please enter a value";

/// Which tasks the list shows. Client-side only, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every member, including loading and deleted tasks
    #[default]
    All,
    /// Only tasks with text that are not deleted
    Filtered,
}

/// One membership entry of the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskRow {
    pub id: TaskId,
    /// `None` while the task is not readable yet
    pub task: Option<Task>,
    /// Whoever last wrote the task's text
    pub text_editor: Option<AccountId>,
}

impl TaskRow {
    pub fn is_visible(&self, mode: FilterMode) -> bool {
        match mode {
            FilterMode::All => true,
            FilterMode::Filtered => self.task.as_ref().is_some_and(Task::is_visible_when_filtered),
        }
    }
}

/// Derived state of one list, recomputed on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub id: ListId,
    /// `None` while loading (or if the list never becomes readable)
    pub title: Option<String>,
    pub role: Option<Role>,
    pub filter: FilterMode,
    /// Every membership entry in insertion order
    pub rows: Vec<TaskRow>,
}

impl ListView {
    fn loading(id: ListId, filter: FilterMode) -> Self {
        Self {
            id,
            title: None,
            role: None,
            filter,
            rows: Vec::new(),
        }
    }

    /// Rows passing the current filter.
    pub fn visible(&self) -> Vec<&TaskRow> {
        self.rows.iter().filter(|row| row.is_visible(self.filter)).collect()
    }

    pub fn can_write(&self) -> bool {
        self.role.is_some_and(|role| role.can_write())
    }
}

struct Inner {
    session: Session,
    list: ListId,
    filter: Cell<FilterMode>,
    list_subscription: RefCell<Option<Subscription>>,
    task_subscriptions: RefCell<HashMap<TaskId, Subscription>>,
    view: RefCell<ListView>,
    observers: Rc<Observers>,
}

impl Inner {
    fn listener(self: &Rc<Self>) -> Listener {
        let weak: Weak<Self> = Rc::downgrade(self);
        Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        })
    }

    fn read_list(&self) -> Option<TodoList> {
        let snapshot = self.session.engine().read(self.list.record())?;
        Some(TodoList::from_snapshot(self.list.clone(), &snapshot))
    }

    fn read_task(&self, id: &TaskId) -> Option<Task> {
        let snapshot = self.session.engine().read(id.record())?;
        Some(Task::from_snapshot(id.clone(), &snapshot))
    }

    /// Subscribe to newly seen members, recompute the view, notify.
    fn refresh(self: &Rc<Self>) {
        let engine = self.session.engine();
        let list = self.read_list();

        let mut view = ListView::loading(self.list.clone(), self.filter.get());
        if let Some(list) = list {
            let unseen: Vec<TaskId> = {
                let subscriptions = self.task_subscriptions.borrow();
                list.tasks
                    .iter()
                    .filter(|id| !subscriptions.contains_key(*id))
                    .cloned()
                    .collect()
            };
            for id in unseen {
                let subscription = engine.subscribe(id.record(), self.listener());
                self.task_subscriptions.borrow_mut().insert(id, subscription);
            }

            view.title = list.title;
            view.role = engine
                .group_of(self.list.record())
                .ok()
                .and_then(|group| engine.role_in(&group));
            view.rows = list
                .tasks
                .iter()
                .map(|id| TaskRow {
                    id: id.clone(),
                    task: self.read_task(id),
                    text_editor: engine.last_editor(id.record(), task::TEXT),
                })
                .collect();
        }

        *self.view.borrow_mut() = view;
        self.observers.notify();
    }
}

/// Live view of one list plus the intents that mutate it.
pub struct ListViewModel {
    inner: Rc<Inner>,
}

impl ListViewModel {
    pub fn new(session: Session, list: ListId) -> Self {
        let filter = session.config().default_filter;
        let inner = Rc::new(Inner {
            view: RefCell::new(ListView::loading(list.clone(), filter)),
            session,
            list,
            filter: Cell::new(filter),
            list_subscription: RefCell::new(None),
            task_subscriptions: RefCell::new(HashMap::new()),
            observers: Observers::new(),
        });

        let subscription = inner
            .session
            .engine()
            .subscribe(inner.list.record(), inner.listener());
        *inner.list_subscription.borrow_mut() = Some(subscription);
        inner.refresh();

        Self { inner }
    }

    /// Create a group and a titled list under it.
    ///
    /// Either the list exists with its title set and its id is returned, or
    /// an error is returned and the caller activates nothing.
    pub fn create_list(session: &Session, title: &str) -> ActionResult<ListId> {
        if title.is_empty() {
            return Err(ActionError::Validation(EMPTY_INPUT));
        }
        let engine = session.engine();
        // No deletion in the engine: a failure below leaves an orphan group
        // or an untitled list, which `known_lists` never shows.
        let group = engine.create_group()?;
        let record = engine.create_record(&group, RecordKind::List)?;
        engine.set_field(&record, list::TITLE, title.into())?;

        info!(list = %record, %group, "list created");
        Ok(ListId::new(record))
    }

    /// Titled lists known to the local replica, oldest first.
    pub fn known_lists(session: &Session) -> Vec<TodoList> {
        let engine = session.engine();
        engine
            .records(RecordKind::List)
            .into_iter()
            .filter_map(|record| {
                let snapshot = engine.read(&record)?;
                Some(TodoList::from_snapshot(ListId::new(record), &snapshot))
            })
            .filter(|list| list.title.is_some())
            .collect()
    }

    pub fn id(&self) -> &ListId {
        &self.inner.list
    }

    pub fn snapshot(&self) -> ListView {
        self.inner.view.borrow().clone()
    }

    /// Notified after every recomputation of the view.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        self.inner.observers.subscribe(listener)
    }

    pub fn filter(&self) -> FilterMode {
        self.inner.filter.get()
    }

    pub fn set_filter(&self, mode: FilterMode) {
        if self.inner.filter.replace(mode) != mode {
            debug!(list = %self.inner.list, ?mode, "filter changed");
            self.inner.refresh();
        }
    }

    /// Create a task under the list's group, then publish it to the list.
    ///
    /// The task is fully written before its id enters the membership set, so
    /// readers never resolve a member that doesn't exist yet.
    pub fn create_task(&self, text: &str) -> ActionResult<TaskId> {
        if text.is_empty() {
            return Err(ActionError::Validation(EMPTY_INPUT));
        }
        let engine = self.inner.session.engine();
        let list_record = self.inner.list.record();
        if engine.read(list_record).is_none() {
            return Err(ActionError::Unreadable(list_record.clone()));
        }
        let group = engine.group_of(list_record)?;
        if !engine.role_in(&group).is_some_and(|role| role.can_write()) {
            return Err(ActionError::Forbidden { required: Role::Writer });
        }

        let record = engine.create_record(&group, RecordKind::Task)?;
        let id = TaskId::parse(&record)
            .ok_or_else(|| EngineError::Rejected(format!("malformed task id {record}")))?;
        engine.set_field(&record, task::TEXT, text.into())?;
        engine.set_field(&record, task::DONE, false.into())?;
        engine.insert_into_set(list_record, list::TASKS, &record)?;

        debug!(list = %self.inner.list, task = %id, "task created");
        Ok(id)
    }

    pub fn set_done(&self, id: &TaskId, done: bool) -> ActionResult<()> {
        self.inner
            .session
            .engine()
            .set_field(id.record(), task::DONE, done.into())?;
        Ok(())
    }

    /// Flip `done`; returns the new value.
    pub fn toggle_done(&self, id: &TaskId) -> ActionResult<bool> {
        let current = self
            .inner
            .read_task(id)
            .ok_or_else(|| ActionError::Unreadable(id.record().clone()))?;
        let done = !current.done;
        self.set_done(id, done)?;
        Ok(done)
    }

    /// Soft-delete. The flag is never written back to `false`.
    pub fn set_deleted(&self, id: &TaskId) -> ActionResult<()> {
        let current = self
            .inner
            .read_task(id)
            .ok_or_else(|| ActionError::Unreadable(id.record().clone()))?;
        if current.deleted {
            return Ok(());
        }
        self.inner
            .session
            .engine()
            .set_field(id.record(), task::DELETED, true.into())?;
        debug!(task = %id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, RecordId};
    use crate::engine::{AccessControl, RecordStore};
    use crate::test_utils::TestBed;

    fn groceries(bed: &TestBed) -> ListViewModel {
        let id = ListViewModel::create_list(&bed.session, "Groceries").expect("Failed to create list");
        ListViewModel::new(bed.session.clone(), id)
    }

    fn texts(view: &ListView) -> Vec<Option<String>> {
        view.visible()
            .iter()
            .map(|row| row.task.as_ref().and_then(|t| t.text.clone()))
            .collect()
    }

    #[test]
    fn test_groceries_scenario() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        assert_eq!(vm.snapshot().title.as_deref(), Some("Groceries"));

        let milk = vm.create_task("Milk").unwrap();
        let view = vm.snapshot();
        assert_eq!(view.visible().len(), 1);
        let task = view.rows[0].task.clone().unwrap();
        assert_eq!((task.text.as_deref(), task.done, task.deleted), (Some("Milk"), false, false));

        assert!(vm.toggle_done(&milk).unwrap());
        let task = vm.snapshot().rows[0].task.clone().unwrap();
        assert!(task.done);

        vm.set_filter(FilterMode::Filtered);
        vm.set_deleted(&milk).unwrap();
        assert!(vm.snapshot().visible().is_empty());

        vm.set_filter(FilterMode::All);
        let view = vm.snapshot();
        assert_eq!(view.visible().len(), 1);
        assert!(view.rows[0].task.as_ref().unwrap().deleted);
    }

    #[test]
    fn test_create_task_adds_exactly_one_row() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        vm.create_task("Eggs").unwrap();
        let before = vm.snapshot().visible().len();

        let id = vm.create_task("Bread").unwrap();

        let view = vm.snapshot();
        assert_eq!(view.visible().len(), before + 1);
        let row = view.rows.iter().find(|row| row.id == id).unwrap();
        let task = row.task.as_ref().unwrap();
        assert_eq!(task.text.as_deref(), Some("Bread"));
        assert!(!task.done);
        assert_eq!(row.text_editor, Some(bed.node.me()));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let bed = TestBed::new("Alice");
        assert_eq!(
            ListViewModel::create_list(&bed.session, ""),
            Err(ActionError::Validation(EMPTY_INPUT))
        );
        let vm = groceries(&bed);
        assert_eq!(vm.create_task(""), Err(ActionError::Validation(EMPTY_INPUT)));
        assert!(vm.snapshot().rows.is_empty());
    }

    #[test]
    fn test_deleted_is_a_latch() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        let id = vm.create_task("Milk").unwrap();

        vm.set_deleted(&id).unwrap();
        vm.toggle_done(&id).unwrap();
        vm.set_done(&id, false).unwrap();
        vm.set_deleted(&id).unwrap();

        assert!(vm.snapshot().rows[0].task.as_ref().unwrap().deleted);
    }

    #[test]
    fn test_filter_law() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        let keep = vm.create_task("Keep").unwrap();
        let gone = vm.create_task("Gone").unwrap();
        vm.set_deleted(&gone).unwrap();
        // A member whose record this replica cannot read stays a loading row.
        let stranger = bed.peer("Mallory");
        let foreign_group = stranger.node.create_group().unwrap();
        let foreign = stranger.node.create_record(&foreign_group, RecordKind::Task).unwrap();
        bed.node
            .insert_into_set(vm.id().record(), list::TASKS, &foreign)
            .unwrap();

        let all = vm.snapshot();
        assert_eq!(all.visible().len(), 3);
        assert!(all.rows[2].task.is_none());

        vm.set_filter(FilterMode::Filtered);
        let filtered = vm.snapshot();
        let ids: Vec<&TaskId> = filtered.visible().iter().map(|row| &row.id).collect();
        assert_eq!(ids, vec![&keep]);
        let expected: Vec<&TaskRow> = all
            .rows
            .iter()
            .filter(|row| row.task.as_ref().is_some_and(|t| t.text.as_deref().is_some_and(|s| !s.is_empty()) && !t.deleted))
            .collect();
        assert_eq!(filtered.visible(), expected);
    }

    #[test]
    fn test_text_less_task_hidden_when_filtered() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        let group = bed.node.group_of(vm.id().record()).unwrap();
        let blank = bed.node.create_record(&group, RecordKind::Task).unwrap();
        bed.node.insert_into_set(vm.id().record(), list::TASKS, &blank).unwrap();

        assert_eq!(texts(&vm.snapshot()), vec![None]);
        vm.set_filter(FilterMode::Filtered);
        assert!(texts(&vm.snapshot()).is_empty());
    }

    #[test]
    fn test_remote_edits_are_pushed() {
        let alice = TestBed::new("Alice");
        let vm = groceries(&alice);
        let milk = vm.create_task("Milk").unwrap();
        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        let _sub = vm.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

        // Bob shares the replica and joins as writer.
        let bob = alice.peer("Bob");
        let group = alice.node.group_of(vm.id().record()).unwrap();
        let secret = alice.node.mint_invite(&group, Role::Writer).unwrap();
        futures::executor::block_on(bob.node.accept_invite(vm.id().record(), &secret)).unwrap();

        bob.node.set_field(milk.record(), task::DONE, FieldValue::from(true)).unwrap();
        assert!(vm.snapshot().rows[0].task.as_ref().unwrap().done);

        let bob_vm = ListViewModel::new(bob.session.clone(), vm.id().clone());
        bob_vm.create_task("Bread").unwrap();
        assert_eq!(texts(&vm.snapshot()), vec![Some("Milk".into()), Some("Bread".into())]);
        assert_eq!(vm.snapshot().rows[1].text_editor, Some(bob.node.me()));
        assert!(notified.get() >= 2);
    }

    #[test]
    fn test_reader_cannot_create_tasks() {
        let alice = TestBed::new("Alice");
        let vm = groceries(&alice);
        let bob = alice.peer("Bob");
        let group = alice.node.group_of(vm.id().record()).unwrap();
        let secret = alice.node.mint_invite(&group, Role::Reader).unwrap();
        futures::executor::block_on(bob.node.accept_invite(vm.id().record(), &secret)).unwrap();

        let bob_vm = ListViewModel::new(bob.session.clone(), vm.id().clone());
        assert!(!bob_vm.snapshot().can_write());
        assert_eq!(
            bob_vm.create_task("Sneaky"),
            Err(ActionError::Forbidden { required: Role::Writer })
        );
    }

    #[test]
    fn test_unreadable_list_stays_loading() {
        let alice = TestBed::new("Alice");
        let vm = groceries(&alice);
        let bob = alice.peer("Bob");

        let bob_vm = ListViewModel::new(bob.session.clone(), vm.id().clone());
        let view = bob_vm.snapshot();
        assert_eq!(view.title, None);
        assert!(view.rows.is_empty());
        assert!(matches!(bob_vm.create_task("Milk"), Err(ActionError::Unreadable(_))));
    }

    #[test]
    fn test_accepting_invite_reveals_open_list() {
        let alice = TestBed::new("Alice");
        let vm = groceries(&alice);
        vm.create_task("Milk").unwrap();
        let bob = alice.peer("Bob");
        let bob_vm = ListViewModel::new(bob.session.clone(), vm.id().clone());
        assert_eq!(bob_vm.snapshot().title, None);

        let group = alice.node.group_of(vm.id().record()).unwrap();
        let secret = alice.node.mint_invite(&group, Role::Writer).unwrap();
        futures::executor::block_on(bob.node.accept_invite(vm.id().record(), &secret)).unwrap();

        let view = bob_vm.snapshot();
        assert_eq!(view.title.as_deref(), Some("Groceries"));
        assert_eq!(view.role, Some(Role::Writer));
        assert_eq!(texts(&view), vec![Some("Milk".into())]);
    }

    #[test]
    fn test_whitespace_input_is_accepted() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        let id = vm.create_task(" ").unwrap();
        assert_eq!(vm.snapshot().rows[0].id, id);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        let list = vm.id().clone();
        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        let sub = vm.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

        drop(vm);
        bed.node
            .set_field(list.record(), list::TITLE, FieldValue::from("Renamed"))
            .unwrap();
        assert_eq!(notified.get(), 0);
        drop(sub);
    }

    #[test]
    fn test_known_lists() {
        let bed = TestBed::new("Alice");
        ListViewModel::create_list(&bed.session, "One").unwrap();
        ListViewModel::create_list(&bed.session, "Two").unwrap();

        let titles: Vec<Option<String>> = ListViewModel::known_lists(&bed.session)
            .into_iter()
            .map(|list| list.title)
            .collect();
        assert_eq!(titles, vec![Some("One".into()), Some("Two".into())]);
        assert!(ListViewModel::known_lists(&bed.peer("Bob").session).is_empty());
    }

    #[test]
    fn test_untitled_list_is_not_known() {
        let bed = TestBed::new("Alice");
        let kept = ListViewModel::create_list(&bed.session, "Kept").unwrap();
        // What a create_list that failed after creating the record leaves behind.
        let group = bed.node.create_group().unwrap();
        bed.node.create_record(&group, RecordKind::List).unwrap();

        let ids: Vec<ListId> = ListViewModel::known_lists(&bed.session)
            .into_iter()
            .map(|list| list.id)
            .collect();
        assert_eq!(ids, vec![kept]);
    }

    #[test]
    fn test_stray_member_is_ignored() {
        let bed = TestBed::new("Alice");
        let vm = groceries(&bed);
        bed.node
            .insert_into_set(vm.id().record(), list::TASKS, &RecordId::from("not-a-task"))
            .unwrap();
        assert!(vm.snapshot().rows.is_empty());
    }
}

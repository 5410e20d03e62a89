use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use speculate2::speculate;
use tickoff::controller::*;
use tickoff::db::Database;
use tickoff::error::PersistError;
use tickoff::models::Task;
use tickoff::persistence::{EphemeralPersistence, SlotPersistence, TaskPersistence};
use tickoff::render::{MemoryRenderer, Renderer, Row};

/// Answers confirmations from a queue and records every message.
#[derive(Default)]
struct ScriptedPrompt {
    answers: VecDeque<bool>,
    asked: Vec<String>,
    notices: Vec<String>,
}

impl ScriptedPrompt {
    fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Refuses every write.
struct FullDisk;

impl TaskPersistence for FullDisk {
    fn load(&self) -> Option<Vec<Task>> {
        None
    }

    fn save(&self, _tasks: &[Task]) -> Result<(), PersistError> {
        Err(anyhow::anyhow!("quota exceeded").into())
    }
}

/// Records the order in which collaborators are called.
#[derive(Clone, Default)]
struct CallLog(Rc<RefCell<Vec<&'static str>>>);

impl TaskPersistence for CallLog {
    fn load(&self) -> Option<Vec<Task>> {
        None
    }

    fn save(&self, _tasks: &[Task]) -> Result<(), PersistError> {
        self.0.borrow_mut().push("save");
        Ok(())
    }
}

impl Renderer for CallLog {
    fn render(&mut self, _rows: &[Row]) -> io::Result<()> {
        self.0.borrow_mut().push("render");
        Ok(())
    }
}

type Slotted = TodoController<SlotPersistence, MemoryRenderer, ScriptedPrompt>;

fn controller(db: &Database, answers: &[bool]) -> Slotted {
    TodoController::start(
        SlotPersistence::new(db.clone(), "tasks"),
        MemoryRenderer::new(),
        ScriptedPrompt::answering(answers),
        ControllerOptions::default(),
    )
}

fn add(controller: &mut Slotted, text: &str) {
    controller.set_input(text);
    assert_eq!(controller.submit(), Submit::Added);
}

fn shown(controller: &Slotted) -> Vec<(String, bool)> {
    controller
        .renderer()
        .rows()
        .iter()
        .map(|row| (row.text.clone(), row.done))
        .collect()
}

fn stored(db: &Database) -> Vec<Task> {
    SlotPersistence::new(db.clone(), "tasks").load().unwrap_or_default()
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "start" {
        it "renders the persisted list once" {
            let mut first = controller(&db, &[]);
            add(&mut first, "From last session");

            let second = controller(&db, &[]);
            assert_eq!(second.renderer().renders(), 1);
            assert_eq!(shown(&second), vec![("From last session".to_string(), false)]);
        }

        it "starts empty over a malformed slot" {
            db.put_slot("tasks", "garbage").unwrap();
            let controller = controller(&db, &[]);
            assert!(controller.store().is_empty());
            assert!(controller.renderer().rows().is_empty());
            assert!(controller.prompt().notices.is_empty());
        }
    }

    describe "submit" {
        it "adds then saves then clears the input and renders" {
            let mut controller = controller(&db, &[]);
            add(&mut controller, "Buy milk");

            assert_eq!(controller.input(), "");
            assert_eq!(controller.store().len(), 1);
            assert_eq!(stored(&db), controller.store().tasks());
            assert_eq!(shown(&controller), vec![("Buy milk".to_string(), false)]);
            assert_eq!(controller.renderer().renders(), 2);
        }

        it "rejects blank input by default" {
            let mut controller = controller(&db, &[]);
            controller.set_input("   ");

            assert_eq!(controller.submit(), Submit::Rejected);
            assert!(controller.store().is_empty());
            assert_eq!(controller.input(), "   ");
            assert_eq!(db.get_slot("tasks").unwrap(), None);
            assert_eq!(controller.prompt().notices, vec![BLANK_REJECTED.to_string()]);
        }

        it "accepts blank input when allowed" {
            let mut controller = TodoController::start(
                EphemeralPersistence,
                MemoryRenderer::new(),
                ScriptedPrompt::default(),
                ControllerOptions { allow_blank: true, ..ControllerOptions::default() },
            );
            controller.set_input("");

            assert_eq!(controller.submit(), Submit::Added);
            assert_eq!(controller.store().len(), 1);
        }

        it "saves before rendering" {
            let log = CallLog::default();
            let mut controller = TodoController::start(
                log.clone(),
                log.clone(),
                ScriptedPrompt::default(),
                ControllerOptions::default(),
            );
            controller.set_input("A");
            controller.submit();

            assert_eq!(*log.0.borrow(), vec!["render", "save", "render"]);
        }
    }

    describe "toggle" {
        it "maps display rows back to storage indexes" {
            let mut controller = controller(&db, &[]);
            add(&mut controller, "A");
            add(&mut controller, "B");

            let texts: Vec<_> = controller.rows().iter().map(|r| r.text.as_str()).collect();
            assert_eq!(texts, vec!["B", "A"]);
            assert_eq!(controller.rows()[0].index, 1);

            assert!(controller.toggle_row(0));

            assert!(!controller.store().tasks()[0].done);
            assert!(controller.store().tasks()[1].done);
            assert_eq!(
                shown(&controller),
                vec![("B".to_string(), true), ("A".to_string(), false)]
            );
            assert!(stored(&db)[1].done);
        }

        it "ignores a stale storage index" {
            let mut controller = controller(&db, &[]);
            add(&mut controller, "A");
            let renders = controller.renderer().renders();

            assert!(!controller.toggle(5));
            assert_eq!(controller.renderer().renders(), renders);
            assert!(!controller.store().tasks()[0].done);
        }

        it "ignores a missing display row" {
            let mut controller = controller(&db, &[]);
            assert!(!controller.toggle_row(0));
        }
    }

    describe "clean" {
        it "removes completed tasks when confirmed" {
            let mut controller = controller(&db, &[true]);
            add(&mut controller, "A");
            add(&mut controller, "B");
            add(&mut controller, "C");
            controller.toggle(1);

            assert_eq!(controller.clean(), BulkOutcome::Removed(1));
            assert_eq!(controller.prompt().asked, vec![CONFIRM_CLEAN.to_string()]);
            assert_eq!(
                shown(&controller),
                vec![("C".to_string(), false), ("A".to_string(), false)]
            );
            assert_eq!(stored(&db).len(), 2);
        }

        it "changes nothing when declined" {
            let mut controller = controller(&db, &[false]);
            add(&mut controller, "A");
            controller.toggle(0);
            let before = controller.store().clone();
            let renders = controller.renderer().renders();

            assert_eq!(controller.clean(), BulkOutcome::Declined);
            assert_eq!(controller.store(), &before);
            assert_eq!(controller.renderer().renders(), renders);
            assert_eq!(stored(&db), before.tasks());
        }
    }

    describe "empty" {
        it "removes everything when confirmed including the durable copy" {
            let mut controller = controller(&db, &[true]);
            add(&mut controller, "A");
            add(&mut controller, "B");

            assert_eq!(controller.empty(), BulkOutcome::Removed(2));
            assert_eq!(controller.prompt().asked, vec![CONFIRM_EMPTY.to_string()]);
            assert!(controller.store().is_empty());
            assert!(controller.renderer().rows().is_empty());
            assert!(stored(&db).is_empty());
        }

        it "changes nothing when declined" {
            let mut controller = controller(&db, &[false]);
            add(&mut controller, "A");

            assert_eq!(controller.empty(), BulkOutcome::Declined);
            assert_eq!(controller.store().len(), 1);
            assert_eq!(stored(&db).len(), 1);
        }
    }

    describe "write failures" {
        it "notifies the user and keeps the in-memory list" {
            let mut controller = TodoController::start(
                FullDisk,
                MemoryRenderer::new(),
                ScriptedPrompt::default(),
                ControllerOptions::default(),
            );
            controller.set_input("Buy milk");

            assert_eq!(controller.submit(), Submit::Added);
            assert_eq!(controller.store().len(), 1);
            assert_eq!(controller.renderer().rows().len(), 1);

            let notices = &controller.prompt().notices;
            assert_eq!(notices.len(), 1);
            assert!(notices[0].contains("quota exceeded"));
        }
    }

    describe "ephemeral session" {
        it "follows the buy milk scenario" {
            let mut controller = TodoController::start(
                EphemeralPersistence,
                MemoryRenderer::new(),
                ScriptedPrompt::answering(&[true]),
                ControllerOptions::default(),
            );

            controller.set_input("Buy milk");
            controller.submit();
            controller.toggle(0);
            assert!(controller.store().tasks()[0].done);

            controller.clean();
            assert!(controller.store().is_empty());
            assert!(controller.renderer().rows().is_empty());
        }
    }
}

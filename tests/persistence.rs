use std::fs;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use tend::io::recovery::recovery_log_path;
use tend::io::store::{KvStore, load_name, load_tasks, save_name, save_tasks};
use tend::model::task::{Filter, Task, parse_date, parse_time};
use tend::model::Config;
use tend::ops::task_ops;
use tend::tui::app::{App, Mode, ROW_EXIT};

fn task(text: &str, completed: bool) -> Task {
    Task {
        text: text.into(),
        completed,
        date: None,
        time: None,
    }
}

#[test]
fn tasks_survive_a_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = KvStore::open(dir.path()).unwrap();
        save_name(&mut store, "Ada").unwrap();
        save_tasks(
            &mut store,
            &[
                Task {
                    text: "Buy milk".into(),
                    completed: false,
                    date: parse_date("2024-05-01"),
                    time: parse_time("09:30"),
                },
                task("Call mom", true),
            ],
        )
        .unwrap();
    }

    let store = KvStore::open(dir.path()).unwrap();
    assert_eq!(load_name(&store).as_deref(), Some("Ada"));

    let loaded = load_tasks(&store);
    assert!(loaded.intact);
    assert_eq!(loaded.tasks.len(), 2);
    assert_eq!(loaded.tasks[0].text, "Buy milk");
    assert_eq!(loaded.tasks[0].date, parse_date("2024-05-01"));
    assert!(loaded.tasks[1].completed);
}

#[test]
fn load_save_load_round_trip_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut store = KvStore::open(dir.path()).unwrap();
    save_tasks(
        &mut store,
        &[
            Task {
                text: "dentist".into(),
                completed: false,
                date: parse_date("2024-06-10"),
                time: None,
            },
            task("water plants", true),
            task("write report", false),
        ],
    )
    .unwrap();

    let first = load_tasks(&store).tasks;
    save_tasks(&mut store, &first).unwrap();

    let store = KvStore::open(dir.path()).unwrap();
    let second = load_tasks(&store).tasks;
    assert_eq!(first, second);
}

#[test]
fn onboarding_then_adding_tasks_end_to_end() {
    let dir = TempDir::new().unwrap();

    {
        let store = KvStore::open(dir.path()).unwrap();
        let mut app = App::new(store, &Config::default());
        assert_eq!(app.mode, Mode::Welcome);

        for c in "Grace".chars() {
            app.name_editor.insert(c);
        }
        app.submit_name();
        assert_eq!(app.mode, Mode::Navigate);

        app.begin_add();
        app.add_form.as_mut().unwrap().text.text = "Buy milk".into();
        app.submit_add();
        app.begin_add();
        app.add_form.as_mut().unwrap().text.text = "Call mom".into();
        app.submit_add();
        app.toggle_visible_row(1);
    }

    // A fresh app over the same directory sees everything
    let store = KvStore::open(dir.path()).unwrap();
    let app = App::new(store, &Config::default());
    assert_eq!(app.mode, Mode::Navigate);
    assert_eq!(app.name.as_deref(), Some("Grace"));
    let texts: Vec<&str> = app.tasks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Buy milk", "Call mom"]);
    assert!(app.tasks[1].completed);
}

#[test]
fn three_tasks_one_done_filtered_to_active() {
    let dir = TempDir::new().unwrap();
    let mut store = KvStore::open(dir.path()).unwrap();
    save_name(&mut store, "Ada").unwrap();
    save_tasks(
        &mut store,
        &[task("one", false), task("two", true), task("three", false)],
    )
    .unwrap();

    let mut app = App::new(store, &Config::default());
    app.set_filter(Filter::Active);

    assert_eq!(task_ops::count_label(&app.tasks), "2 items left");
    assert_eq!(app.visible_rows(), vec![0, 2]);
    // Filtering never touches the underlying records
    assert_eq!(load_tasks(&app.store).tasks, app.tasks);
}

#[test]
fn clearing_every_task_persists_an_empty_list() {
    let dir = TempDir::new().unwrap();
    let mut store = KvStore::open(dir.path()).unwrap();
    save_name(&mut store, "Ada").unwrap();
    save_tasks(&mut store, &[task("one", true), task("two", true)]).unwrap();

    {
        let mut app = App::new(store, &Config::default());
        let now = Instant::now();
        app.clear_completed(now);
        app.on_tick(now + ROW_EXIT + Duration::from_millis(1));
        assert!(task_ops::is_empty_state(&app.tasks));
    }

    let store = KvStore::open(dir.path()).unwrap();
    let loaded = load_tasks(&store);
    assert!(loaded.intact);
    assert!(loaded.tasks.is_empty());
}

#[test]
fn corrupt_store_fails_closed_and_keeps_the_payload() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("store.json"), "definitely not json").unwrap();

    let store = KvStore::open(dir.path()).unwrap();
    let app = App::new(store, &Config::default());
    assert!(app.tasks.is_empty());
    assert!(app.status_message.is_some());

    let log = fs::read_to_string(recovery_log_path(dir.path())).unwrap();
    assert!(log.contains("definitely not json"));

    // The store is usable again after the failed read
    let mut app = app;
    task_ops::add_task(&mut app.tasks, "start over", None, None).unwrap();
    app.save();
    let store = KvStore::open(dir.path()).unwrap();
    assert_eq!(load_tasks(&store).tasks.len(), 1);
}

#[test]
fn corrupt_tasks_value_leaves_the_name_alone() {
    let dir = TempDir::new().unwrap();
    let mut store = KvStore::open(dir.path()).unwrap();
    save_name(&mut store, "Ada").unwrap();
    store.set("tasks", "[{not records".into()).unwrap();

    let store = KvStore::open(dir.path()).unwrap();
    let app = App::new(store, &Config::default());
    assert_eq!(app.name.as_deref(), Some("Ada"));
    assert_eq!(app.mode, Mode::Navigate);
    assert!(app.tasks.is_empty());

    let log = fs::read_to_string(recovery_log_path(dir.path())).unwrap();
    assert!(log.contains("[{not records"));
}

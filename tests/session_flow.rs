use pretty_assertions::assert_eq;
use ux_healthcheck::store::ANSWERS_KEY;
use ux_healthcheck::{
    CategoryKey, Event, FileStore, KeyValueStore, Page, Session, Tier, Transition, View,
};

fn answer_page(session: &mut Session<FileStore>, values: [u8; 4]) {
    for (n, value) in values.into_iter().enumerate() {
        session.choose_current(value).unwrap();
        if n < 3 {
            assert_eq!(
                session.handle(Event::NextQuestion).unwrap(),
                Transition::Moved(session.page())
            );
        }
    }
}

#[test]
fn full_assessment_survives_reload_and_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::new(FileStore::new(dir.path()));
    assert_eq!(session.view(), View::Welcome);
    session.handle(Event::NextPage).unwrap();

    answer_page(&mut session, [0, 0, 0, 0]);
    session.handle(Event::NextPage).unwrap();
    answer_page(&mut session, [3, 1, 1, 0]);

    // 途中で終了して読み直す
    let saved = session.answers().clone();
    drop(session);
    let mut session = Session::new(FileStore::new(dir.path()));
    assert_eq!(session.answers(), &saved);
    assert_eq!(session.page(), Page::Welcome);

    session.handle(Event::NextPage).unwrap();
    session.handle(Event::NextPage).unwrap();
    assert_eq!(session.page(), Page::Category(CategoryKey::Forms));
    session.handle(Event::NextPage).unwrap();
    answer_page(&mut session, [1, 1, 1, 3]);
    session.handle(Event::NextPage).unwrap();
    answer_page(&mut session, [3, 3, 3, 3]);

    let Transition::Finished(report) = session.handle(Event::NextPage).unwrap() else {
        panic!("expected the results page");
    };
    assert_eq!(report.total, 23);
    assert_eq!(report.tier, Tier::SignificantProblems);
    assert_eq!(report.plan.category, CategoryKey::Mobile);
    assert!(report.plan.quick_win);
    assert_eq!(
        report.ranking.iter().map(|r| r.key).collect::<Vec<_>>(),
        vec![
            CategoryKey::Mobile,
            CategoryKey::Forms,
            CategoryKey::Navigation,
            CategoryKey::Accessibility
        ]
    );

    session.handle(Event::Restart).unwrap();
    assert_eq!(session.page(), Page::Welcome);
    assert!(session.answers().is_empty());
    assert_eq!(session.store().get(ANSWERS_KEY).unwrap(), None);

    let reloaded = Session::new(FileStore::new(dir.path()));
    assert!(reloaded.answers().is_empty());
}

#[test]
fn corrupt_saved_answers_start_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set(ANSWERS_KEY, "definitely not json").unwrap();

    let session = Session::new(store);
    assert!(session.answers().is_empty());
    assert!(!session.gate_open(CategoryKey::Mobile));
}

use std::sync::Once;
use std::time::Duration;

use catalog_core::{
    update, AppState, Effect, Msg, Pagination, Project, ProjectQuery, RequestId, TableBody,
    DEBOUNCE_DELAY,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

fn fetch_of(effects: &[Effect]) -> Option<(RequestId, ProjectQuery)> {
    effects.iter().find_map(|effect| match effect {
        Effect::FetchProjects { request_id, query } => Some((*request_id, query.clone())),
        _ => None,
    })
}

fn timer_of(effects: &[Effect]) -> Option<u64> {
    effects.iter().find_map(|effect| match effect {
        Effect::ScheduleSearch { timer_id, .. } => Some(*timer_id),
        _ => None,
    })
}

fn projects(range: std::ops::RangeInclusive<u64>) -> Vec<Project> {
    range
        .map(|id| Project {
            id,
            name: format!("Project {id}"),
        })
        .collect()
}

fn pagination(page: u32, total_count: u64) -> Pagination {
    Pagination {
        page,
        page_size: 20,
        total_count,
        total_pages: total_count.div_ceil(20) as u32,
    }
}

/// Starts the view and answers the initial unfiltered query.
fn loaded_state(total_count: u64) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::Started);
    let (request_id, _) = fetch_of(&effects).expect("initial fetch");
    let (state, _) = update(
        state,
        Msg::ProjectsLoaded {
            request_id,
            projects: projects(1..=20),
            pagination: pagination(1, total_count),
        },
    );
    state
}

fn search_for(state: AppState, term: &str) -> AppState {
    let (state, _) = update(state, Msg::SearchInputChanged(term.to_string()));
    let (state, effects) = update(state, Msg::EnterPressed);
    let (request_id, _) = fetch_of(&effects).expect("search fetch");
    let (state, _) = update(
        state,
        Msg::ProjectsLoaded {
            request_id,
            projects: projects(1..=20),
            pagination: pagination(1, 95),
        },
    );
    state
}

#[test]
fn start_issues_unfiltered_first_page() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);

    assert_eq!(
        effects,
        vec![Effect::FetchProjects {
            request_id: 1,
            query: ProjectQuery::unfiltered(1),
        }]
    );
    assert!(state.is_loading());
    assert_eq!(state.view().listing.body, TableBody::Skeleton(8));
    assert!(state.view().listing.show_spinner);
}

#[test]
fn typing_schedules_debounced_search() {
    init_logging();
    let state = loaded_state(200);
    let (state, effects) = update(state, Msg::SearchInputChanged("bridge".into()));

    assert_eq!(
        effects,
        vec![Effect::ScheduleSearch {
            timer_id: 1,
            delay: DEBOUNCE_DELAY,
        }]
    );
    assert_eq!(state.pending_input(), "bridge");
    assert_eq!(state.keyword(), "");
    assert!(!state.is_loading());
    assert!(state.view().listing.show_clear_button);

    let (state, effects) = update(state, Msg::SearchTimerElapsed { timer_id: 1 });
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::with_keyword(1, "bridge"))
    );
    assert!(state.is_loading());
    assert!(!state.has_pending_search());
}

#[test]
fn configured_debounce_delay_is_used() {
    let state = AppState::new().with_debounce_delay(Duration::from_millis(50));
    let (_, effects) = update(state, Msg::SearchInputChanged("road".into()));
    assert_eq!(
        effects,
        vec![Effect::ScheduleSearch {
            timer_id: 1,
            delay: Duration::from_millis(50),
        }]
    );
}

#[test]
fn only_latest_timer_fires() {
    init_logging();
    let state = loaded_state(200);
    let (state, first) = update(state, Msg::SearchInputChanged("ro".into()));
    let (state, second) = update(state, Msg::SearchInputChanged("road".into()));
    let first_timer = timer_of(&first).unwrap();
    let second_timer = timer_of(&second).unwrap();
    assert_ne!(first_timer, second_timer);

    let (state, effects) = update(
        state,
        Msg::SearchTimerElapsed {
            timer_id: first_timer,
        },
    );
    assert!(effects.is_empty());
    assert!(state.has_pending_search());

    let (_, effects) = update(
        state,
        Msg::SearchTimerElapsed {
            timer_id: second_timer,
        },
    );
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::with_keyword(1, "road"))
    );
}

#[test]
fn single_character_term_issues_no_request() {
    init_logging();
    let state = loaded_state(200);
    let (state, effects) = update(state, Msg::SearchInputChanged("a".into()));
    let timer_id = timer_of(&effects).unwrap();

    let (state, effects) = update(state, Msg::SearchTimerElapsed { timer_id });
    assert!(effects.is_empty());
    assert!(!state.is_loading());

    let (state, effects) = update(state, Msg::SearchIconClicked);
    assert!(effects.is_empty());
    assert!(!state.is_loading());

    let (state, _) = update(state, Msg::SearchInputChanged("  b ".into()));
    let (state, effects) = update(state, Msg::SearchIconClicked);
    assert!(fetch_of(&effects).is_none());
    assert_eq!(state.keyword(), "");
}

#[test]
fn multibyte_terms_count_characters() {
    init_logging();
    let state = loaded_state(200);
    let (state, effects) = update(state, Msg::SearchInputChanged("桥".into()));
    let timer_id = timer_of(&effects).unwrap();
    let (_, effects) = update(state, Msg::SearchTimerElapsed { timer_id });
    assert!(effects.is_empty());

    let state = loaded_state(200);
    let (state, _) = update(state, Msg::SearchInputChanged("桥梁".into()));
    let (_, effects) = update(state, Msg::EnterPressed);
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::with_keyword(1, "桥梁"))
    );
}

#[test]
fn keyword_is_committed_on_completion() {
    init_logging();
    let state = loaded_state(200);
    let (state, _) = update(state, Msg::SearchInputChanged("tunnel".into()));
    let (state, effects) = update(state, Msg::EnterPressed);
    assert_eq!(state.keyword(), "");

    let (request_id, _) = fetch_of(&effects).unwrap();
    let (state, _) = update(
        state,
        Msg::ProjectsLoaded {
            request_id,
            projects: projects(1..=5),
            pagination: pagination(1, 5),
        },
    );
    let view = state.view().listing;
    assert_eq!(state.keyword(), "tunnel");
    assert_eq!(view.result_count, Some(5));
    assert!(!view.loading);
}

#[test]
fn composition_suspends_debounce() {
    init_logging();
    let state = loaded_state(200);
    let (state, effects) = update(state, Msg::SearchInputChanged("qi".into()));
    let stale_timer = timer_of(&effects).unwrap();

    let (state, effects) = update(state, Msg::CompositionStarted);
    assert_eq!(effects, vec![Effect::CancelSearch]);
    assert!(state.is_composing());

    let (state, effects) = update(state, Msg::SearchInputChanged("qiao".into()));
    assert!(effects.is_empty());
    assert_eq!(state.pending_input(), "qiao");

    let (state, effects) = update(state, Msg::EnterPressed);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::SearchTimerElapsed {
            timer_id: stale_timer,
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::CompositionEnded("桥梁".into()));
    assert!(!state.is_composing());
    assert_eq!(state.pending_input(), "桥梁");
    let timer_id = timer_of(&effects).expect("timer restarted");

    let (_, effects) = update(state, Msg::SearchTimerElapsed { timer_id });
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::with_keyword(1, "桥梁"))
    );
}

#[test]
fn enter_bypasses_debounce() {
    init_logging();
    let state = loaded_state(200);
    let (state, _) = update(state, Msg::SearchInputChanged("bridge".into()));
    let (state, effects) = update(state, Msg::EnterPressed);

    assert_eq!(effects[0], Effect::CancelSearch);
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::with_keyword(1, "bridge"))
    );
    assert!(!state.has_pending_search());
}

#[test]
fn clear_resets_search_and_refetches_unfiltered() {
    init_logging();
    let state = search_for(loaded_state(200), "bridge");
    assert_eq!(state.keyword(), "bridge");

    let (state, _) = update(state, Msg::SearchInputChanged("bridges".into()));
    let (state, effects) = update(state, Msg::ClearClicked);

    assert_eq!(state.keyword(), "");
    assert_eq!(state.pending_input(), "");
    assert!(!state.has_pending_search());
    assert_eq!(
        effects,
        vec![
            Effect::CancelSearch,
            Effect::FetchProjects {
                request_id: 3,
                query: ProjectQuery::unfiltered(1),
            },
            Effect::FocusSearchInput,
        ]
    );
    let view = state.view().listing;
    assert!(!view.show_clear_button);
    assert_eq!(view.result_count, None);
}

#[test]
fn page_change_uses_committed_keyword() {
    init_logging();
    let state = search_for(loaded_state(200), "bridge");
    let (state, _) = update(state, Msg::SearchInputChanged("tunnel".into()));

    let (state, effects) = update(state, Msg::PageSelected(3));
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::with_keyword(3, "bridge"))
    );
    assert_eq!(state.pending_input(), "tunnel");
}

#[test]
fn unfiltered_page_change_sends_empty_keyword() {
    init_logging();
    let state = loaded_state(200);
    let (_, effects) = update(state, Msg::PageSelected(2));
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::with_keyword(2, ""))
    );

    let (_, effects) = update(loaded_state(200), Msg::PageSelected(0));
    assert!(effects.is_empty());
}

#[test]
fn previous_and_next_respect_bounds() {
    init_logging();
    let state = loaded_state(40);
    let view = state.view().listing;
    assert!(!view.can_go_previous);
    assert!(view.can_go_next);

    let (state, effects) = update(state, Msg::PreviousPageClicked);
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::NextPageClicked);
    let (request_id, query) = fetch_of(&effects).unwrap();
    assert_eq!(query, ProjectQuery::with_keyword(2, ""));

    let (state, _) = update(
        state,
        Msg::ProjectsLoaded {
            request_id,
            projects: projects(21..=40),
            pagination: pagination(2, 40),
        },
    );
    let view = state.view().listing;
    assert!(view.can_go_previous);
    assert!(!view.can_go_next);

    let (state, effects) = update(state, Msg::NextPageClicked);
    assert!(effects.is_empty());

    let (_, effects) = update(state, Msg::PreviousPageClicked);
    assert_eq!(
        fetch_of(&effects).map(|(_, query)| query),
        Some(ProjectQuery::unfiltered(1))
    );
}

#[test]
fn stale_response_does_not_overwrite_newer_request() {
    init_logging();
    let state = loaded_state(200);
    let (state, effects) = update(state, Msg::PageSelected(2));
    let (slow_id, _) = fetch_of(&effects).unwrap();
    let (state, effects) = update(state, Msg::PageSelected(3));
    let (fast_id, _) = fetch_of(&effects).unwrap();

    let (state, _) = update(
        state,
        Msg::ProjectsLoaded {
            request_id: fast_id,
            projects: projects(41..=60),
            pagination: pagination(3, 200),
        },
    );
    let (state, _) = update(
        state,
        Msg::ProjectsLoaded {
            request_id: slow_id,
            projects: projects(21..=40),
            pagination: pagination(2, 200),
        },
    );

    let view = state.view().listing;
    assert_eq!(view.pagination.page, 3);
    assert_eq!(view.body, TableBody::Rows(projects(41..=60)));
    assert!(!view.loading);
}

#[test]
fn stale_response_keeps_loading_until_latest_arrives() {
    init_logging();
    let state = loaded_state(200);
    let (state, effects) = update(state, Msg::PageSelected(2));
    let (slow_id, _) = fetch_of(&effects).unwrap();
    let (state, _) = update(state, Msg::PageSelected(3));

    let (state, _) = update(
        state,
        Msg::ProjectsFailed {
            request_id: slow_id,
            reason: "connection reset".into(),
        },
    );
    assert!(state.is_loading());
}

#[test]
fn failure_keeps_last_good_rows() {
    init_logging();
    let state = loaded_state(200);
    let (state, effects) = update(state, Msg::PageSelected(2));
    let (request_id, _) = fetch_of(&effects).unwrap();

    let loading_view = state.view().listing;
    assert!(loading_view.loading);
    assert_eq!(loading_view.body, TableBody::Rows(projects(1..=20)));

    let (state, effects) = update(
        state,
        Msg::ProjectsFailed {
            request_id,
            reason: "timeout".into(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view().listing;
    assert!(!view.loading);
    assert_eq!(view.pagination.page, 1);
    assert_eq!(view.body, TableBody::Rows(projects(1..=20)));
}

#[test]
fn empty_result_renders_no_data_row() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);
    let (request_id, _) = fetch_of(&effects).unwrap();
    let (mut state, _) = update(
        state,
        Msg::ProjectsLoaded {
            request_id,
            projects: Vec::new(),
            pagination: pagination(1, 0),
        },
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view().listing.body, TableBody::Empty);
}

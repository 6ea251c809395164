use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => state.fetch_page(1, "").into_iter().collect(),
        Msg::SearchInputChanged(value) => {
            state.set_pending_input(value.clone());
            if state.is_composing() {
                Vec::new()
            } else {
                vec![state.schedule_search(value)]
            }
        }
        Msg::CompositionStarted => {
            state.set_composing(true);
            state.cancel_search().into_iter().collect()
        }
        Msg::CompositionEnded(value) => {
            state.set_composing(false);
            state.set_pending_input(value.clone());
            vec![state.schedule_search(value)]
        }
        Msg::EnterPressed if state.is_composing() => Vec::new(),
        Msg::EnterPressed | Msg::SearchIconClicked => {
            let term = state.pending_input().to_string();
            search_now(&mut state, &term)
        }
        Msg::ClearClicked => {
            state.clear_search();
            let mut effects = search_now(&mut state, "");
            effects.push(Effect::FocusSearchInput);
            effects
        }
        Msg::PageSelected(0) => Vec::new(),
        Msg::PageSelected(page) => go_to_page(&mut state, page),
        Msg::PreviousPageClicked => {
            let page = state.current_page();
            if page > 1 {
                go_to_page(&mut state, page - 1)
            } else {
                Vec::new()
            }
        }
        Msg::NextPageClicked => {
            let page = state.current_page();
            if page < state.total_pages() {
                go_to_page(&mut state, page + 1)
            } else {
                Vec::new()
            }
        }
        Msg::SearchTimerElapsed { timer_id } => match state.take_elapsed_search(timer_id) {
            Some(term) => state.fetch_page(1, &term).into_iter().collect(),
            None => Vec::new(),
        },
        Msg::ProjectsLoaded {
            request_id,
            projects,
            pagination,
        } => {
            state.apply_projects(request_id, projects, pagination);
            Vec::new()
        }
        Msg::ProjectsFailed { request_id, reason } => {
            state.apply_projects_failed(request_id, &reason);
            Vec::new()
        }
        Msg::FileSelected(file) => {
            state.select_file(file);
            Vec::new()
        }
        Msg::UploadClicked => state.begin_upload().into_iter().collect(),
        Msg::UploadFinished { upload_id, result } => {
            state.finish_upload(upload_id, result);
            Vec::new()
        }
    };

    (state, effects)
}

/// Bypasses the debounce window: cancels any pending timer and queries page 1.
fn search_now(state: &mut AppState, term: &str) -> Vec<Effect> {
    let mut effects: Vec<Effect> = state.cancel_search().into_iter().collect();
    effects.extend(state.fetch_page(1, term));
    effects
}

/// Page navigation always uses the committed keyword, not the live input.
fn go_to_page(state: &mut AppState, page: u32) -> Vec<Effect> {
    let keyword = state.keyword().to_string();
    state.fetch_page(page, &keyword).into_iter().collect()
}

use crate::{DispatchRequest, Effect, Msg, SearchPhase, SearchState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SearchState, msg: Msg) -> (SearchState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            let delay = state.config().debounce;
            state.record_input(text.clone());
            vec![Effect::Debounce { text, delay }]
        }
        Msg::InputSettled(text) => {
            // A fire that raced a newer keystroke through the channel.
            if state.phase() != SearchPhase::Debouncing || text != state.input() {
                return (state, Vec::new());
            }

            let query = text.trim().to_owned();
            let sources = state.plan(&query);
            let generation = state.next_generation();
            if sources.is_empty() {
                state.publish_empty(generation);
                return (state, Vec::new());
            }

            state.begin_aggregation(generation, query.clone(), sources.clone());
            vec![Effect::Dispatch(DispatchRequest {
                generation,
                query,
                sources,
                save_history: state.config().save_history,
            })]
        }
        Msg::BatchReceived(batch) => {
            state.apply_batch(batch);
            Vec::new()
        }
        Msg::SourceToggled { source, enabled } => {
            state.set_source_enabled(&source, enabled);
            Vec::new()
        }
        Msg::HistoryToggled(save_history) => {
            state.set_save_history(save_history);
            Vec::new()
        }
        Msg::RestoreRecentQueries(queries) => {
            state.restore_recent(queries);
            Vec::new()
        }
        Msg::Reset => {
            state.reset();
            vec![Effect::CancelDebounce]
        }
    };

    (state, effects)
}

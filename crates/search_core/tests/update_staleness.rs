use pretty_assertions::assert_eq;
use search_core::{
    update, ApartmentHit, Effect, Generation, LocationHit, Msg, SearchPhase, SearchState,
    SourceBatch, UnifiedResult,
};

fn loc(name: &str) -> UnifiedResult {
    UnifiedResult::Location(LocationHit {
        code: name.to_string(),
        name: name.to_string(),
        full_name: None,
    })
}

fn apt(name: &str) -> UnifiedResult {
    UnifiedResult::Apartment(ApartmentHit {
        id: name.to_string(),
        name: name.to_string(),
        address: None,
        households: None,
    })
}

fn batch(source: &str, generation: Generation, results: Vec<UnifiedResult>) -> Msg {
    Msg::BatchReceived(SourceBatch {
        source: source.to_string(),
        generation,
        results,
    })
}

fn settle(state: SearchState, input: &str) -> (SearchState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::InputSettled(input.to_string()))
}

#[test]
fn generations_strictly_increase() {
    let mut state = SearchState::default();
    let mut seen = Vec::new();
    for input in ["a", "ab", "", "abc", "a"] {
        let (next, _) = settle(state, input);
        seen.push(next.generation());
        state = next;
    }
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

#[test]
fn older_generation_completing_late_never_overwrites_newer() {
    let (state, _) = settle(SearchState::default(), "강");
    let (state, _) = settle(state, "강남");
    assert_eq!(state.generation(), 2);

    // Generation 2 completes first.
    let (state, _) = update(state, batch("locations", 2, vec![loc("강남구")]));
    let (state, _) = update(state, batch("apartments", 2, vec![apt("강남래미안")]));
    // Generation 1 trickles in afterwards.
    let (state, _) = update(state, batch("locations", 1, vec![loc("강서구")]));

    let view = state.view();
    assert_eq!(view.results, vec![loc("강남구"), apt("강남래미안")]);
    assert_eq!(view.published_generation, Some(2));
    assert!(!view.is_searching);
}

#[test]
fn older_generation_completing_while_newer_pending_is_discarded() {
    let (state, _) = settle(SearchState::default(), "강");
    let (state, _) = settle(state, "강남");

    let (state, _) = update(state, batch("locations", 1, vec![loc("강서구")]));
    let view = state.view();
    assert!(view.results.is_empty());
    assert!(view.is_searching);
    assert_eq!(view.published_generation, None);

    let (state, _) = update(state, batch("locations", 2, vec![loc("강남구")]));
    let (state, _) = update(state, batch("apartments", 2, Vec::new()));
    assert_eq!(state.view().results, vec![loc("강남구")]);
}

#[test]
fn pending_newer_generation_keeps_previous_results_visible() {
    let (state, _) = settle(SearchState::default(), "역");
    let (state, _) = update(state, batch("locations", 1, vec![loc("역삼동")]));
    assert_eq!(state.view().published_generation, Some(1));

    let (state, _) = settle(state, "역삼");
    let view = state.view();
    assert!(view.is_searching);
    assert_eq!(view.results, vec![loc("역삼동")]);
    assert_eq!(view.published_generation, Some(1));
}

#[test]
fn keystroke_during_dispatch_abandons_in_flight_generation() {
    let (state, _) = settle(SearchState::default(), "강남");
    let (state, _) = update(state, batch("locations", 1, vec![loc("강남구")]));
    assert_eq!(state.phase(), SearchPhase::Aggregating);

    let (state, effects) = update(state, Msg::InputChanged("강남역".to_string()));
    assert_eq!(effects.len(), 1);
    assert_eq!(state.phase(), SearchPhase::Debouncing);

    // The abandoned generation's last batch must not publish anything.
    let (state, _) = update(state, batch("apartments", 1, vec![apt("stale")]));
    let view = state.view();
    assert!(view.results.is_empty());
    assert_eq!(view.published_generation, None);
    assert_eq!(view.phase, SearchPhase::Debouncing);
}

#[test]
fn short_circuit_is_not_overwritten_by_earlier_generation() {
    let (state, _) = settle(SearchState::default(), "강남");
    let (state, effects) = settle(state, " ");
    assert!(effects.is_empty());
    assert_eq!(state.view().published_generation, Some(2));

    let (state, _) = update(state, batch("locations", 1, vec![loc("강남구")]));
    let (state, _) = update(state, batch("apartments", 1, vec![apt("래미안")]));

    let view = state.view();
    assert!(view.results.is_empty());
    assert!(!view.is_searching);
    assert_eq!(view.published_generation, Some(2));
}

#[test]
fn burst_of_keystrokes_dispatches_only_final_value() {
    let mut state = SearchState::default();
    let mut dispatches = Vec::new();
    for input in ["ㄱ", "가", "강", "강ㄴ", "강나", "강남"] {
        let (next, effects) = update(state, Msg::InputChanged(input.to_string()));
        state = next;
        dispatches.extend(
            effects
                .into_iter()
                .filter(|effect| matches!(effect, Effect::Dispatch(_))),
        );
    }
    // Late fires for superseded values raced through the channel.
    for stale in ["강", "강나"] {
        let (next, effects) = update(state, Msg::InputSettled(stale.to_string()));
        state = next;
        assert!(effects.is_empty());
    }
    let (state, effects) = update(state, Msg::InputSettled("강남".to_string()));
    dispatches.extend(effects);

    assert_eq!(dispatches.len(), 1);
    assert_eq!(state.generation(), 1);
}

use search_core::{SearchViewModel, UnifiedResult};

pub fn render(view: &SearchViewModel) -> Vec<String> {
    if view.is_searching {
        return vec![format!("searching... (#{})", view.generation)];
    }

    let Some(generation) = view.published_generation else {
        return Vec::new();
    };
    if view.results.is_empty() {
        return vec![format!("#{generation}: no results")];
    }

    let mut lines = Vec::with_capacity(view.results.len() + 1);
    lines.push(format!("#{generation}: {} results", view.results.len()));
    lines.extend(view.results.iter().map(render_row));
    lines
}

fn render_row(result: &UnifiedResult) -> String {
    match result {
        UnifiedResult::Location(hit) => {
            format!("  [{}] {} ({})", result.kind(), result.title(), hit.code)
        }
        UnifiedResult::Apartment(hit) => match (&hit.address, hit.households) {
            (Some(address), Some(households)) => {
                format!(
                    "  [{}] {} - {} ({} households)",
                    result.kind(),
                    hit.name,
                    address,
                    households
                )
            }
            (Some(address), None) => format!("  [{}] {} - {}", result.kind(), hit.name, address),
            (None, _) => format!("  [{}] {}", result.kind(), hit.name),
        },
    }
}

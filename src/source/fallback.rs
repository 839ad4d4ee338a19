use chrono::NaiveDate;

use crate::calendar::Event;

/// Bundled dataset shown when the published sheet is unreachable or
/// yields no valid rows.
///
/// The type labels here keep their accented spellings (`"evaluación"`)
/// while live-converted data is accent-stripped; every type comparison
/// goes through [`crate::calendar::normalize_type`], so both coexist.
pub fn fallback_events() -> Vec<Event> {
    vec![
        event(
            2025, 1, 15,
            "Evaluación Matemática I",
            "evaluación",
            "Matemática I",
            "Examen parcial sobre funciones cuadráticas y ecuaciones de segundo grado",
        ),
        event(
            2025, 1, 20,
            "TP Algoritmos y Estructuras de Datos",
            "tp",
            "Algoritmos y Estructuras de Datos",
            "Implementar árboles binarios de búsqueda y realizar análisis de complejidad",
        ),
        event(
            2025, 1, 25,
            "Tarea Programación Web",
            "tarea",
            "Programación Web",
            "Realizar función cuadrática de 10 ejercicios. Entregar código fuente y resultados",
        ),
        event(
            2025, 1, 28,
            "Evaluación Física II",
            "evaluación",
            "Física II",
            "Examen sobre electromagnetismo y circuitos eléctricos",
        ),
        event(
            2025, 2, 3,
            "TP Base de Datos",
            "tp",
            "Base de Datos",
            "Diseñar e implementar un sistema de gestión de biblioteca con MySQL",
        ),
        event(
            2025, 2, 3,
            "Examen Base de Datos",
            "evaluación",
            "Base de Datos",
            "Examen teórico sobre normalización, índices y optimización de consultas",
        ),
        event(
            2025, 2, 10,
            "Tarea Inglés Técnico",
            "tarea",
            "Inglés Técnico",
            "Traducir documento técnico sobre inteligencia artificial (5 páginas)",
        ),
    ]
}

fn event(
    year: i32,
    month: u32,
    day: u32,
    title: &str,
    event_type: &str,
    subject: &str,
    description: &str,
) -> Event {
    let date = NaiveDate::from_ymd_opt(year, month, day).expect("bundled dates are valid");
    Event::new(date, title, event_type, subject, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{FilterState, filter_events, group_by_date};
    use pretty_assertions::assert_eq;

    #[test]
    fn bundle_has_seven_events_with_six_distinct_dates() {
        let events = fallback_events();
        assert_eq!(events.len(), 7);

        let grouped = group_by_date(&events);
        assert_eq!(grouped.len(), 6);

        let shared = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let pair = &grouped[&shared];
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0].title, "TP Base de Datos");
        assert_eq!(pair[1].title, "Examen Base de Datos");
    }

    #[test]
    fn accented_bundle_types_match_normalized_filters() {
        let events = fallback_events();
        let filter = FilterState::from_params(Some("evaluacion"), None);

        assert_eq!(filter_events(&events, &filter).len(), 3);
    }
}

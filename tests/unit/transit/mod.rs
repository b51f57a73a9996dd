use super::*;

fn query() -> ArrivalQuery {
    ArrivalQuery {
        stop_id: "30254".to_string(),
        route: "Brn".to_string(),
        destination: "loop".to_string(),
        max_results: 2,
    }
}

#[test]
fn request_url_encodes_parameters() {
    let url = query().request_url("http://example.test/arrivals", "a b&c");
    assert_eq!(
        url,
        "http://example.test/arrivals?key=a%20b%26c&stpid=30254&max=2&outputType=JSON"
    );
}

#[test]
fn finish_sorts_and_truncates() {
    let out = query().finish(vec![
        Arrival::live(9),
        Arrival::live(1),
        Arrival::live(4),
    ]);
    assert_eq!(out, vec![Arrival::live(1), Arrival::live(4)]);
}

#[test]
fn alert_flags() {
    assert!(!Arrival::live(3).needs_alert());
    let sched = Arrival {
        is_scheduled: true,
        ..Arrival::live(3)
    };
    let late = Arrival {
        is_delayed: true,
        ..Arrival::live(3)
    };
    assert!(sched.needs_alert());
    assert!(late.needs_alert());
}

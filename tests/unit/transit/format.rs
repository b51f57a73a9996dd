use super::*;

fn text(arrivals: Option<&[Arrival]>) -> (String, String) {
    let t = DisplayText::from_arrivals(arrivals, "Loop");
    (t.primary, t.secondary)
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

#[test]
fn minutes_pluralize() {
    assert_eq!(format_minutes(0), "0 mins away");
    assert_eq!(format_minutes(1), "1 min away");
    assert_eq!(format_minutes(12), "12 mins away");
}

#[test]
fn two_live_trains() {
    let a = [Arrival::live(1), Arrival::live(9)];
    assert_eq!(text(Some(&a)), pair("1 min away", "Next: 9 mins away"));
}

#[test]
fn no_trains_and_no_data() {
    assert_eq!(text(Some(&[])), pair("No trains", "No service to Loop"));
    assert_eq!(text(None), pair("--", "No Data"));
}

#[test]
fn single_train() {
    assert_eq!(
        text(Some(&[Arrival::live(4)])),
        pair("4 mins away", "No additional trains")
    );
}

#[test]
fn delayed_first_train_still_shows_next() {
    let delayed = Arrival {
        is_delayed: true,
        ..Arrival::live(2)
    };
    let a = [delayed, Arrival::live(8)];
    assert_eq!(text(Some(&a)), pair("No trains", "Next: 8 mins away"));
}

#[test]
fn both_trains_flagged() {
    let sched = Arrival {
        is_scheduled: true,
        ..Arrival::live(5)
    };
    let a = [sched, sched];
    assert_eq!(text(Some(&a)), pair("No trains", "No other train inbound"));
}

#[test]
fn lone_flagged_train() {
    let sched = Arrival {
        is_scheduled: true,
        ..Arrival::live(5)
    };
    assert_eq!(
        text(Some(&[sched])),
        pair("No trains", "No additional trains")
    );
}

#[test]
fn second_train_scheduled_only() {
    let sched = Arrival {
        is_scheduled: true,
        ..Arrival::live(11)
    };
    let a = [Arrival::live(3), sched];
    assert_eq!(text(Some(&a)), pair("3 mins away", "No other train inbound"));
}

#[test]
fn fixed_states() {
    assert_eq!(DisplayText::loading().primary, "--");
    assert_eq!(DisplayText::error(), DisplayText::new("Error", "--"));
}

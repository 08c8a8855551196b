use crate::record::{parse_line, LogKind, LogRecord};

#[test]
pub fn parses_all_markers() {
    assert_eq!(
        parse_line("DEBUG: Waited for borders for 12.5 milliseconds"),
        Ok(Some(LogRecord {
            kind: LogKind::BorderWait,
            millis: 12.5
        }))
    );
    assert_eq!(
        parse_line("DEBUG: Waited for ghosts for 7.5 milliseconds"),
        Ok(Some(LogRecord {
            kind: LogKind::GhostWait,
            millis: 7.5
        }))
    );
    assert_eq!(
        parse_line("TIME: Simulation took 20000.0 milliseconds"),
        Ok(Some(LogRecord {
            kind: LogKind::TotalTime,
            millis: 20000.0
        }))
    );
}

#[test]
pub fn integer_payload() {
    assert_eq!(
        parse_line("TIME: Simulation took 42 milliseconds\n"),
        Ok(Some(LogRecord {
            kind: LogKind::TotalTime,
            millis: 42.0
        }))
    );
}

#[test]
pub fn unrelated_lines_are_ignored() {
    assert_eq!(parse_line(""), Ok(None));
    assert_eq!(parse_line("DEBUG: Sent borders to 3"), Ok(None));
    assert_eq!(parse_line("Took 12.0 milliseconds with 4 threads"), Ok(None));
    // markers only count at the start of a line
    assert_eq!(
        parse_line("  DEBUG: Waited for borders for 1.0 milliseconds"),
        Ok(None)
    );
}

#[test]
pub fn malformed_payload() {
    let error = parse_line("DEBUG: Waited for ghosts for lots of milliseconds").unwrap_err();
    assert_eq!(error.kind, LogKind::GhostWait);

    assert!(parse_line("DEBUG: Waited for borders for 1.2.3 milliseconds").is_err());
    assert!(parse_line("TIME: Simulation took 15.0 seconds").is_err());
    assert!(parse_line("TIME: Simulation took").is_err());
}

#[test]
pub fn kind_names() {
    assert_eq!(LogKind::BorderWait.to_string(), "border-wait");
    assert_eq!(LogKind::GhostWait.to_string(), "ghost-wait");
    assert_eq!(LogKind::TotalTime.to_string(), "total-time");
}

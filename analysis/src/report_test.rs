use crate::{
    aggregate::ConfigurationSummary,
    report::{format_row, size_label, write_report},
};
use sweep_runner::sweep::{RunId, Size};

fn summary(size: Size, time: f64, border: f64, ghost: f64) -> ConfigurationSummary {
    ConfigurationSummary {
        id: RunId {
            nodes: 64,
            size,
            threads: 32,
        },
        time,
        border,
        ghost,
        overhead: (border + ghost) * 100.0 / time,
    }
}

#[test]
pub fn reference_row() {
    assert_eq!(
        format_row(&summary(Size::square(8192), 20.0, 12.5, 7.5)),
        "64\t8192\t32\t20.000\t12.500\t7.500\t100.000"
    );
}

#[test]
pub fn fields_and_decimals() {
    for row in [
        summary(Size::square(2048), 0.001, 0.0, 0.0),
        summary(Size::new(8192, 4096), 7200.123456, 1.0 / 3.0, 2.0 / 3.0),
        summary(Size::square(16384), 123456.789, 98765.4321, 0.0005),
    ] {
        let row = format_row(&row);
        let fields = row.split('\t').collect::<Vec<_>>();

        assert_eq!(fields.len(), 7, "{row}");
        for field in &fields[3..] {
            let (_, decimals) = field.split_once('.').unwrap();
            assert_eq!(decimals.len(), 3, "{row}");
        }
    }
}

#[test]
pub fn rectangular_sizes() {
    assert_eq!(size_label(&Size::square(4096)), "4096");
    assert_eq!(size_label(&Size::new(8192, 4096)), "8192x4096");
    assert!(format_row(&summary(Size::new(8192, 4096), 1.0, 1.0, 1.0))
        .starts_with("64\t8192x4096\t32\t"));
}

#[test]
pub fn writes_one_line_per_summary() {
    let summaries = [
        summary(Size::square(2048), 1.0, 0.5, 0.5),
        summary(Size::square(4096), 2.0, 0.5, 0.5),
    ];

    let mut output = Vec::new();
    assert_eq!(write_report(&mut output, &summaries).unwrap(), 2);

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "64\t2048\t32\t1.000\t0.500\t0.500\t100.000\n64\t4096\t32\t2.000\t0.500\t0.500\t50.000\n"
    );
}

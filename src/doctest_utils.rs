// Internal utilities for documentation tests
// This file contains sample header texts used by doctests

/// A labeled three-lead header as found in the challenge training set
pub fn sample_header() -> String {
    [
        "00001_lr 3 100 1000 12:00:00 01/01/2000",
        "00001_lr.dat 16 1000.0(0)/mV 16 0 -119 1508 0 I",
        "00001_lr.dat 16 1000.0(0)/mV 16 0 -55 723 0 II",
        "00001_lr.dat 16 1000.0(0)/mV 16 0 -54 -10717 0 V1",
        "#Dx: NORM",
        "#Image: 00001_lr-0.png",
        "",
    ]
    .join("\n")
}

/// The same record with its diagnosis removed, as in the held-out set
pub fn sample_unlabeled_header() -> String {
    sample_header()
        .lines()
        .filter(|line| !line.starts_with("#Dx:"))
        .map(|line| format!("{}\n", line))
        .collect()
}

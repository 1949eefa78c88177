/// Formats whole seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Returns the label shown next to a ranked entry, given its zero-based index
pub fn rank_label(index: usize) -> String {
    match index {
        0 => "👑".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("#{}", n + 1),
    }
}

#[cfg(test)]
mod test {
    use super::{format_clock, rank_label};

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(120), "2:00");
    }

    #[test]
    fn podium_gets_medals() {
        let labels: Vec<_> = (0..5).map(rank_label).collect();
        assert_eq!(labels, vec!["👑", "🥈", "🥉", "#4", "#5"]);
    }
}

//! Right-sizing suggestions from CPU utilization

/// Instance sizes from smallest to largest
pub const SIZE_LADDER: [&str; 12] = [
    "nano", "micro", "small", "medium", "large", "xlarge", "2xlarge", "4xlarge", "8xlarge",
    "12xlarge", "16xlarge", "24xlarge",
];

/// Suggest an instance type for the observed average CPU utilization (percent)
///
/// Types that do not parse as `family.size`, or whose size is not on the
/// ladder, are returned unchanged. Moves are clamped to the ladder ends.
pub fn suggest_instance_type(current_type: &str, avg_cpu_utilization: f64) -> String {
    let Some((family, size)) = parse_instance_type(current_type) else {
        return current_type.to_string();
    };

    let Some(index) = SIZE_LADDER.iter().position(|s| *s == size) else {
        return current_type.to_string();
    };

    // First match wins, checked in this order: <10, <30, >80, >90
    let step: isize = if avg_cpu_utilization < 10.0 {
        -2
    } else if avg_cpu_utilization < 30.0 {
        -1
    } else if avg_cpu_utilization > 80.0 {
        1
    } else if avg_cpu_utilization > 90.0 {
        2
    } else {
        0
    };

    if step == 0 {
        return current_type.to_string();
    }

    let new_index = (index as isize + step).clamp(0, SIZE_LADDER.len() as isize - 1) as usize;
    format!("{}.{}", family, SIZE_LADDER[new_index])
}

/// Split `family.size`; exactly two non-empty parts are required
fn parse_instance_type(instance_type: &str) -> Option<(&str, &str)> {
    let mut parts = instance_type.split('.');
    let family = parts.next()?;
    let size = parts.next()?;
    if parts.next().is_some() || family.is_empty() || size.is_empty() {
        return None;
    }
    Some((family, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severely_underutilized_drops_two_sizes() {
        assert_eq!(suggest_instance_type("m5.2xlarge", 5.0), "m5.large");
    }

    #[test]
    fn test_underutilized_drops_one_size() {
        assert_eq!(suggest_instance_type("m5.2xlarge", 20.0), "m5.xlarge");
    }

    #[test]
    fn test_overutilized_grows_one_size() {
        assert_eq!(suggest_instance_type("c5.large", 85.0), "c5.xlarge");
        // The >80 band is checked before >90
        assert_eq!(suggest_instance_type("c5.large", 95.0), "c5.xlarge");
    }

    #[test]
    fn test_well_utilized_is_unchanged() {
        assert_eq!(suggest_instance_type("t3.medium", 30.0), "t3.medium");
        assert_eq!(suggest_instance_type("t3.medium", 55.0), "t3.medium");
        assert_eq!(suggest_instance_type("t3.medium", 80.0), "t3.medium");
    }

    #[test]
    fn test_clamped_at_ladder_ends() {
        assert_eq!(suggest_instance_type("t3.nano", 5.0), "t3.nano");
        assert_eq!(suggest_instance_type("t3.micro", 5.0), "t3.nano");
        assert_eq!(suggest_instance_type("t3.24xlarge", 95.0), "t3.24xlarge");
    }

    #[test]
    fn test_malformed_types_unchanged() {
        assert_eq!(suggest_instance_type("t3", 5.0), "t3");
        assert_eq!(suggest_instance_type("t3.large.extra", 5.0), "t3.large.extra");
        assert_eq!(suggest_instance_type(".large", 5.0), ".large");
        assert_eq!(suggest_instance_type("t3.", 5.0), "t3.");
        assert_eq!(suggest_instance_type("t3.metal", 5.0), "t3.metal");
    }

    #[test]
    fn test_nan_utilization_unchanged() {
        assert_eq!(suggest_instance_type("t3.large", f64::NAN), "t3.large");
    }
}

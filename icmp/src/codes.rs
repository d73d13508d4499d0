//! Static `(type, code) -> description` table, grounded on the reference
//! source's `__ICMP_CODES` dictionary (SPEC_FULL.md S3, "Icmp Code Table").

/// Looks up a human-readable description for an ICMP `(type, code)` pair,
/// synthesizing an "Unknown ..." string for anything not in the table.
pub fn describe(icmp_type: u8, icmp_code: u8) -> String {
    match icmp_type {
        0 => match icmp_code {
            0 => "Echo Reply".to_string(),
            _ => unknown_code(icmp_type, icmp_code),
        },
        3 => destination_unreachable(icmp_code),
        8 => match icmp_code {
            0 => "Echo Request".to_string(),
            _ => unknown_code(icmp_type, icmp_code),
        },
        11 => match icmp_code {
            0 => "Time to Live exceeded in transit".to_string(),
            1 => "Fragment reassembly time exceeded".to_string(),
            _ => unknown_code(icmp_type, icmp_code),
        },
        _ => format!("Unknown ICMP Type {icmp_type}, Code {icmp_code}"),
    }
}

fn destination_unreachable(code: u8) -> String {
    let text = match code {
        0 => "Network Unreachable",
        1 => "Host Unreachable",
        2 => "Protocol Unreachable",
        3 => "Port Unreachable",
        4 => "Fragmentation needed but DF bit set",
        5 => "Source route failed",
        6 => "Destination network unknown",
        7 => "Destination host unknown",
        8 => "Source host isolated",
        9 => "Destination network administratively prohibited",
        10 => "Destination host administratively prohibited",
        11 => "Network unreachable for TOS",
        12 => "Host unreachable for TOS",
        13 => "Communication administratively prohibited",
        14 => "Host precedence violation",
        15 => "Precedence cutoff in effect",
        _ => return unknown_code(3, code),
    };
    text.to_string()
}

fn unknown_code(icmp_type: u8, icmp_code: u8) -> String {
    format!("Unknown Code {icmp_code} for Type {icmp_type}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_entries_match_table() {
        assert_eq!(describe(0, 0), "Echo Reply");
        assert_eq!(describe(3, 3), "Port Unreachable");
        assert_eq!(describe(11, 0), "Time to Live exceeded in transit");
        assert_eq!(describe(8, 0), "Echo Request");
    }

    #[test]
    fn unknown_type_is_synthesized() {
        assert_eq!(describe(200, 4), "Unknown ICMP Type 200, Code 4");
    }

    #[test]
    fn unknown_code_for_known_type_is_synthesized() {
        assert_eq!(describe(11, 9), "Unknown Code 9 for Type 11");
    }
}

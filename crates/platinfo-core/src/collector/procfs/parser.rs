//! Parsers for `/proc` and `/sys` files.
//!
//! These are pure functions that parse the content of kernel pseudo-files
//! into structured data. They are designed to be easily testable with string
//! inputs. Each positional format is read with a [`FieldScanner`] that
//! names every field and aborts on the first one that does not scan.

use std::str::{FromStr, SplitAsciiWhitespace};

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Sequential reader over whitespace-separated fields.
struct FieldScanner<'a> {
    fields: SplitAsciiWhitespace<'a>,
}

impl<'a> FieldScanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            fields: input.split_ascii_whitespace(),
        }
    }

    fn next(&mut self, name: &str) -> Result<&'a str, ParseError> {
        self.fields
            .next()
            .ok_or_else(|| ParseError::new(format!("missing field {name}")))
    }

    fn parse<T: FromStr>(&mut self, name: &str) -> Result<T, ParseError> {
        let raw = self.next(name)?;
        raw.parse()
            .map_err(|_| ParseError::new(format!("invalid {name}: '{raw}'")))
    }

    /// Consumes one field per name, each of which must scan as `T`.
    fn skip<T: FromStr>(&mut self, names: &[&str]) -> Result<(), ParseError> {
        for name in names {
            self.parse::<T>(name)?;
        }
        Ok(())
    }
}

/// Fields of `/proc/[pid]/stat` used by the process memory reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcStat {
    pub pid: u32,
    pub comm: String,
    pub state: char,
    pub ppid: i32,
    pub utime: u64,
    pub stime: u64,
    pub num_threads: i64,
    pub starttime: u64,
    /// Virtual memory size in bytes.
    pub vsize: u64,
    /// Resident set size in pages.
    pub rss: u64,
}

/// Parses `/proc/[pid]/stat` content.
///
/// The comm field is wrapped in parentheses and may itself contain spaces
/// and parentheses, so it ends at the last `)` followed by a space. Every
/// field from the pid through `startstack` must scan; anything after that
/// is ignored.
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, ParseError> {
    let content = content.trim_end();

    let open_paren = content
        .find('(')
        .ok_or_else(|| ParseError::new("missing '(' in stat"))?;
    let pid = content[..open_paren]
        .trim()
        .parse()
        .map_err(|_| ParseError::new("invalid pid"))?;

    let after_open = &content[open_paren + 1..];
    let close_paren = after_open
        .rfind(") ")
        .ok_or_else(|| ParseError::new("unterminated comm in stat"))?;
    let comm = after_open[..close_paren].to_string();

    let mut fields = FieldScanner::new(&after_open[close_paren + 2..]);

    let state_field = fields.next("state")?;
    let mut chars = state_field.chars();
    let state = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(ParseError::new(format!("invalid state: '{state_field}'"))),
    };
    let ppid = fields.parse("ppid")?;
    fields.skip::<i32>(&["pgrp", "session", "tty_nr", "tpgid"])?;
    fields.skip::<u32>(&["flags"])?;
    fields.skip::<u64>(&["minflt", "cminflt", "majflt", "cmajflt"])?;
    let utime = fields.parse("utime")?;
    let stime = fields.parse("stime")?;
    fields.skip::<i64>(&["cutime", "cstime", "priority", "nice"])?;
    let num_threads = fields.parse("num_threads")?;
    fields.skip::<i64>(&["itrealvalue"])?;
    let starttime = fields.parse("starttime")?;
    let vsize = fields.parse("vsize")?;
    let rss = fields.parse("rss")?;
    fields.skip::<u64>(&["rsslim", "startcode", "endcode", "startstack"])?;

    Ok(ProcStat {
        pid,
        comm,
        state,
        ppid,
        utime,
        stime,
        num_threads,
        starttime,
        vsize,
        rss,
    })
}

/// Summary of `/proc/cpuinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuInfoSummary {
    /// Number of `model name` lines.
    pub count: usize,
    /// Model of the first CPU; later models are ignored.
    pub model: String,
    /// `cpu MHz` of the first CPU, truncated to whole MHz.
    pub speed_mhz: u32,
}

/// Parses `/proc/cpuinfo` content.
///
/// Only the first core's model and clock speed are recorded. Unparseable
/// `cpu MHz` values are skipped.
pub fn parse_cpuinfo(content: &str) -> CpuInfoSummary {
    let mut info = CpuInfoSummary::default();

    for line in content.lines() {
        if line.starts_with("model name") {
            info.count += 1;
            if info.count == 1 {
                info.model = value_after_colon(line).to_string();
            }
        } else if line.starts_with("cpu MHz") && info.count == 1 {
            if let Ok(mhz) = value_after_colon(line).parse::<f64>() {
                info.speed_mhz = mhz as u32;
            }
        }
    }

    info
}

fn value_after_colon(line: &str) -> &str {
    line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("")
}

/// Per-CPU tick counters from one `cpuN` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub cpu_id: u32,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub irq: u64,
}

/// Parses the per-CPU lines of `/proc/stat`.
///
/// The aggregate `cpu` line is skipped and scanning stops at the first line
/// that is not a `cpu` line. Columns: user nice system idle iowait irq; iowait
/// is checked but not kept.
pub fn parse_cpu_ticks(content: &str) -> Result<Vec<CpuTicks>, ParseError> {
    let mut cpus = Vec::new();

    for line in content.lines() {
        let mut fields = FieldScanner::new(line);
        let Ok(key) = fields.next("cpu key") else {
            continue;
        };
        let Some(id) = key.strip_prefix("cpu") else {
            break;
        };
        if !id.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        let cpu_id = id
            .parse()
            .map_err(|_| ParseError::new(format!("invalid cpu key: '{key}'")))?;

        let user = fields.parse("user")?;
        let nice = fields.parse("nice")?;
        let system = fields.parse("system")?;
        let idle = fields.parse("idle")?;
        fields.skip::<u64>(&["iowait"])?;
        let irq = fields.parse("irq")?;

        cpus.push(CpuTicks {
            cpu_id,
            user,
            nice,
            system,
            idle,
            irq,
        });
    }

    Ok(cpus)
}

/// Parses `cpufreq/cpuinfo_max_freq` (kHz) into MHz.
pub fn parse_max_freq_mhz(content: &str) -> Result<u32, ParseError> {
    let raw = content.trim();
    let khz: u64 = raw
        .parse()
        .map_err(|_| ParseError::new(format!("expected integer kHz value, got '{raw}'")))?;
    u32::try_from(khz / 1000)
        .map_err(|_| ParseError::new(format!("frequency out of range: {khz} kHz")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::self_stat_line;

    #[test]
    fn test_parse_proc_stat_basic() {
        let content = "1234 (bash) S 1233 1234 1234 34816 1235 4194304 5000 50000 10 20 100 50 200 100 20 0 1 0 100000 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 5 0 0 0 0 0 0 0 0 0 0";
        let stat = parse_proc_stat(content).unwrap();

        assert_eq!(stat.pid, 1234);
        assert_eq!(stat.comm, "bash");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.ppid, 1233);
        assert_eq!(stat.utime, 100);
        assert_eq!(stat.stime, 50);
        assert_eq!(stat.num_threads, 1);
        assert_eq!(stat.starttime, 100000);
        assert_eq!(stat.vsize, 25000000);
        assert_eq!(stat.rss, 2000);
    }

    #[test]
    fn test_parse_proc_stat_with_spaces_in_comm() {
        let content = self_stat_line(5000, "Web Content", 2_000_000_000, 50_000);
        let stat = parse_proc_stat(&content).unwrap();

        assert_eq!(stat.pid, 5000);
        assert_eq!(stat.comm, "Web Content");
        assert_eq!(stat.vsize, 2_000_000_000);
        assert_eq!(stat.rss, 50_000);
    }

    #[test]
    fn test_parse_proc_stat_with_parentheses_in_comm() {
        let content = self_stat_line(5001, "test(1)", 10_000_000, 1_000);
        let stat = parse_proc_stat(&content).unwrap();

        assert_eq!(stat.comm, "test(1)");
        assert_eq!(stat.vsize, 10_000_000);
    }

    #[test]
    fn test_parse_proc_stat_fake_comm_terminator() {
        // "(a) (b)" contains a ") " inside the comm itself.
        let content = self_stat_line(42, "a) (b", 123_456_789, 321);
        let stat = parse_proc_stat(&content).unwrap();

        assert_eq!(stat.comm, "a) (b");
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.vsize, 123_456_789);
        assert_eq!(stat.rss, 321);
    }

    #[test]
    fn test_parse_proc_stat_truncated() {
        let content = "1 (init) S 0 1 1 0 -1 4194560 100 0 0 0 10 5 0 0 20 0 1 0 5 1000";
        let err = parse_proc_stat(content).unwrap_err();
        assert_eq!(err.message, "missing field rss");
    }

    #[test]
    fn test_parse_proc_stat_invalid_field() {
        let content = self_stat_line(1, "init", 1000, 10).replace(" 100000 ", " later ");
        let err = parse_proc_stat(&content).unwrap_err();
        assert_eq!(err.message, "invalid starttime: 'later'");
    }

    #[test]
    fn test_parse_proc_stat_missing_parens() {
        assert!(parse_proc_stat("1 init S 0").is_err());
        assert!(parse_proc_stat("1 (init S 0 1").is_err());
        assert!(parse_proc_stat("x (init) S 0 1").is_err());
    }

    #[test]
    fn test_parse_cpuinfo_first_model_wins() {
        let content = "\
processor\t: 0
model name\t: Big Core
cpu MHz\t\t: 2400.750
processor\t: 1
model name\t: Little Core
cpu MHz\t\t: 1200.000
";
        let info = parse_cpuinfo(content);
        assert_eq!(info.count, 2);
        assert_eq!(info.model, "Big Core");
        assert_eq!(info.speed_mhz, 2400);
    }

    #[test]
    fn test_parse_cpuinfo_without_model_lines() {
        let content = "processor\t: 0\nBogoMIPS\t: 108.00\nFeatures\t: fp asimd\n";
        let info = parse_cpuinfo(content);
        assert_eq!(info, CpuInfoSummary::default());
    }

    #[test]
    fn test_parse_cpuinfo_bad_speed_ignored() {
        let content = "model name\t: X\ncpu MHz\t\t: unknown\n";
        let info = parse_cpuinfo(content);
        assert_eq!(info.count, 1);
        assert_eq!(info.speed_mhz, 0);
    }

    #[test]
    fn test_parse_cpu_ticks() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2600 130 760 19900 240 60 25 0 0 0
intr 1000000 50 0 0
cpu7 1 1 1 1 1 1 1
";
        let cpus = parse_cpu_ticks(content).unwrap();

        assert_eq!(cpus.len(), 2);
        assert_eq!(
            cpus[0],
            CpuTicks {
                cpu_id: 0,
                user: 2500,
                nice: 125,
                system: 750,
                idle: 20000,
                irq: 50,
            }
        );
        assert_eq!(cpus[1].cpu_id, 1);
        assert_eq!(cpus[1].irq, 60);
    }

    #[test]
    fn test_parse_cpu_ticks_sparse_ids() {
        let content = "cpu 1 1 1 1 1 1\ncpu0 1 2 3 4 5 6\ncpu2 7 8 9 10 11 12\n";
        let cpus = parse_cpu_ticks(content).unwrap();
        assert_eq!(
            cpus.iter().map(|c| c.cpu_id).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn test_parse_cpu_ticks_malformed_line() {
        let err = parse_cpu_ticks("cpu0 1 2 three 4 5 6\n").unwrap_err();
        assert_eq!(err.message, "invalid system: 'three'");

        let err = parse_cpu_ticks("cpu0 1 2 3 4\n").unwrap_err();
        assert_eq!(err.message, "missing field iowait");
    }

    #[test]
    fn test_parse_max_freq() {
        assert_eq!(parse_max_freq_mhz("3600000\n").unwrap(), 3600);
        assert_eq!(parse_max_freq_mhz("1500").unwrap(), 1);
        assert!(parse_max_freq_mhz("fast").is_err());
    }
}

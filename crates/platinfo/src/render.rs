//! Plain-text rendering of query results.

use std::fmt::Write;

use chrono::{DateTime, Duration, Local};

use platinfo_core::fmt::{FmtStyle, format_bytes, format_duration, format_ms};
use platinfo_core::{CpuRecord, InterfaceTable, LoadAverage, ProcessMemoryInfo, Snapshot};

pub fn memory(process: &ProcessMemoryInfo, free: f64, total: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "process: rss {}, virtual {}",
        format_bytes(process.resident_bytes, FmtStyle::Detail),
        format_bytes(process.virtual_bytes, FmtStyle::Detail)
    );
    let _ = writeln!(
        out,
        "system:  free {} of {}",
        format_bytes(free as u64, FmtStyle::Detail),
        format_bytes(total as u64, FmtStyle::Detail)
    );
    out
}

pub fn cpus(cpus: &[CpuRecord]) -> String {
    let mut out = String::new();
    for (i, cpu) in cpus.iter().enumerate() {
        let t = &cpu.times;
        let _ = writeln!(
            out,
            "cpu{i:<3} {:>5} MHz  user {:>7} nice {:>7} sys {:>7} idle {:>7} irq {:>7}  {}",
            cpu.speed_mhz,
            format_ms(t.user),
            format_ms(t.nice),
            format_ms(t.sys),
            format_ms(t.idle),
            format_ms(t.irq),
            cpu.model
        );
    }
    out
}

pub fn load(load: &LoadAverage) -> String {
    format!(
        "load average: {:.2}, {:.2}, {:.2}",
        load.load1, load.load5, load.load15
    )
}

/// Wall-clock time `uptime` seconds before `now`.
fn boot_time(now: DateTime<Local>, uptime: f64) -> DateTime<Local> {
    now - Duration::milliseconds((uptime * 1000.0) as i64)
}

pub fn uptime(uptime: f64, process_age: f64) -> String {
    if uptime < 0.0 {
        return "uptime unavailable".to_string();
    }
    let booted = boot_time(Local::now(), uptime);
    format!(
        "up {} (since {}), process age {}",
        format_duration(uptime, FmtStyle::Detail),
        booted.format("%Y-%m-%d %H:%M:%S"),
        format_duration(process_age, FmtStyle::Detail)
    )
}

pub fn interfaces(table: &InterfaceTable) -> String {
    let mut out = String::new();
    for (name, addrs) in table.iter() {
        let _ = writeln!(out, "{name}:");
        for addr in addrs {
            let scope = if addr.internal { " (internal)" } else { "" };
            let _ = writeln!(out, "  {:<5} {}{scope}", addr.family, addr.address);
        }
    }
    out
}

pub fn snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "title:   {}", snapshot.title);
    if let Some(path) = &snapshot.executable_path {
        let _ = writeln!(out, "exe:     {path}");
    }
    let _ = writeln!(out, "{}", uptime(snapshot.uptime, snapshot.process_age));
    if let Some(load_avg) = &snapshot.load_average {
        let _ = writeln!(out, "{}", load(load_avg));
    }
    if let (Some(process), Some(free), Some(total)) =
        (&snapshot.memory, snapshot.free_memory, snapshot.total_memory)
    {
        out.push_str(&memory(process, free, total));
    }
    if !snapshot.cpus.is_empty() {
        out.push_str(&cpus(&snapshot.cpus));
    }
    if let Some(table) = &snapshot.interfaces {
        out.push_str(&interfaces(table));
    }
    for error in &snapshot.errors {
        let _ = writeln!(out, "error:   {error}");
    }
    out
}

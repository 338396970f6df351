//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` and `/sys` states for the
//! readers in this crate.

use super::filesystem::MockFs;

/// Builds a `/proc/[pid]/stat` line with the given comm, `vsize` and `rss`.
///
/// All other fields carry plausible values for an idle shell.
pub fn self_stat_line(pid: u32, comm: &str, vsize: u64, rss_pages: u64) -> String {
    format!(
        "{pid} ({comm}) S 1233 {pid} {pid} 34816 {pid} 4194304 5000 50000 10 20 100 50 200 100 \
         20 0 1 0 100000 {vsize} {rss_pages} 18446744073709551615 94000000000000 94000000100000 \
         140730000000000 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 5 0 0 0 0 0 0 0 0 0 0\n"
    )
}

impl MockFs {
    /// A four-core x86 host with cpufreq on every core.
    ///
    /// Includes `/proc/self/stat`, `/proc/self/exe`, `/proc/cpuinfo`,
    /// `/proc/stat` and `cpuinfo_max_freq` for cores 0-3.
    pub fn four_core_system() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/self/stat",
            self_stat_line(4242, "node", 1_073_741_824, 12_800),
        );
        fs.add_link("/proc/self/exe", "/usr/local/bin/node");

        let mut cpuinfo = String::new();
        for cpu in 0..4 {
            cpuinfo.push_str(&format!(
                "\
processor\t: {cpu}
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 158
model name\t: Intel(R) Core(TM) i7-8700 CPU @ 3.20GHz
stepping\t: 10
cpu MHz\t\t: {mhz}.123
cache size\t: 12288 KB
flags\t\t: fpu vme de pse tsc msr pae mce cx8

",
                mhz = 3192 + cpu * 100
            ));
        }
        fs.add_file("/proc/cpuinfo", cpuinfo);

        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2600 130 760 19900 240 60 25 0 0 0
cpu2 2400 120 740 20100 260 40 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );

        for cpu in 0..4 {
            fs.add_cpu_max_freq(cpu, 4_600_000);
        }

        fs
    }

    /// A single-core virtual machine without cpufreq support.
    ///
    /// Clock speed is only available from `/proc/cpuinfo`.
    pub fn single_core_vm() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/self/stat",
            self_stat_line(77, "worker", 268_435_456, 2_048),
        );
        fs.add_link("/proc/self/exe", "/opt/app/bin/worker");
        fs.add_file(
            "/proc/cpuinfo",
            "\
processor\t: 0
vendor_id\t: AuthenticAMD
model name\t: AMD EPYC 7B13
cpu MHz\t\t: 2449.998
flags\t\t: fpu vme de pse tsc hypervisor
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  5000 0 1200 90000 300 0 10 0 0 0
cpu0 5000 0 1200 90000 300 0 10 0 0 0
intr 20000 0 0 0
ctxt 120000
",
        );

        fs
    }
}

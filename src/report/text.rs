use crate::report::{ContrastReport, SummaryData, format_f64_6, format_opt_f64_6};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Time-Resolved Decoding Cohort Report\n");
    out.push_str("====================================\n\n");

    out.push_str("1. Run\n");
    out.push_str(&format!("Subjects: {}\n", data.cohort.len()));
    out.push_str(&format!("Time points: {}\n", data.times.len()));
    if let (Some(first), Some(last)) = (data.times.as_slice().first(), data.times.as_slice().last()) {
        out.push_str(&format!(
            "Time range: {} .. {} s\n",
            format_f64_6(*first),
            format_f64_6(*last)
        ));
    }
    out.push_str(&format!("Chance level: {}\n", format_f64_6(data.chance_level)));
    match data.window {
        Some((tmin, tmax)) => out.push_str(&format!(
            "Peak window: {} .. {} s\n\n",
            format_f64_6(tmin),
            format_f64_6(tmax)
        )),
        None => out.push_str("Peak window: full axis\n\n"),
    }

    out.push_str("2. Group curves\n");
    for report in &data.reports {
        out.push_str(&contrast_line(report));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("3. Per-subject peaks\n");
    for report in &data.reports {
        out.push_str(&format!("[{}]\n", report.contrast));
        for sp in &report.subject_peaks {
            match sp.peak {
                Some(p) => out.push_str(&format!(
                    "  {}: {} at {} s\n",
                    sp.subject,
                    format_f64_6(p.value),
                    format_f64_6(p.time)
                )),
                None => out.push_str(&format!("  {}: no finite score in window\n", sp.subject)),
            }
        }
    }

    out
}

fn contrast_line(report: &ContrastReport) -> String {
    match report.mean_peak {
        Some(peak) => format!(
            "{} (n={}): peak mean {} at {} s, SEM {}, above chance by {}",
            report.contrast,
            report.n_subjects,
            format_f64_6(peak.value),
            format_f64_6(peak.time),
            format_opt_f64_6(report.sem_at_peak),
            format_opt_f64_6(report.margin_above_chance)
        ),
        None => format!(
            "{} (n={}): no finite mean score in window",
            report.contrast, report.n_subjects
        ),
    }
}

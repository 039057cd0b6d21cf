use crate::cli::ScanArgs;
use crate::teloscan::{
    detect::{detect, Params},
    record::{stream_records_into_channel, SequenceRecord},
    report::{log_summary, sort_reports, write_reports, SeqReport},
};
use crate::utils::Result;
use crossbeam_channel::{bounded, Sender};
use itertools::Itertools;
use rayon::{
    iter::{ParallelBridge, ParallelIterator},
    ThreadPoolBuilder,
};
use std::{io, sync::Arc, thread};

const CHANNEL_BUFFER_SIZE: usize = 2048;

pub fn scan(args: ScanArgs) -> Result<()> {
    let params = Arc::new(Params::new(
        args.motifs,
        args.min_repeats,
        args.window,
        args.max_offset,
    )?);
    log::info!(
        "Searching for {} within {} bp of each end (>= {} repeats)",
        params.motifs.iter().join(","),
        params.window,
        params.min_repeats
    );

    let (sender_record, receiver_record) = bounded(CHANNEL_BUFFER_SIZE);
    let fasta_path = args.fasta_path.clone();
    let record_stream_thread =
        thread::spawn(move || stream_records_into_channel(&fasta_path, sender_record));

    let (sender_report, receiver_report) = bounded(CHANNEL_BUFFER_SIZE);
    let collector_thread =
        thread::spawn(move || -> Vec<SeqReport> { receiver_report.iter().collect() });

    log::debug!(
        "Initializing thread pool with {} threads...",
        args.num_threads
    );
    let pool = initialize_thread_pool(args.num_threads)?;
    pool.install(|| {
        receiver_record
            .into_iter()
            .enumerate()
            .par_bridge()
            .for_each_with(&sender_report, |s, (index, record)| {
                process_record(index, record, &params, s)
            });
    });

    // Clean-up
    drop(sender_report);
    let mut reports = collector_thread.join().expect("Collector thread panicked");
    log::trace!("Collector thread finished");
    record_stream_thread
        .join()
        .expect("Record stream thread panicked")?;
    log::trace!("Record stream thread finished");

    // Reporting happens only once the whole input has been read cleanly.
    sort_reports(&mut reports);
    write_reports(&reports, &mut io::stdout().lock())
        .map_err(|e| format!("Failed to write report: {}", e))?;
    log_summary(&reports);

    Ok(())
}

fn process_record(
    index: usize,
    record: SequenceRecord,
    params: &Arc<Params>,
    sender_report: &Sender<SeqReport>,
) {
    let detection = detect(&record.seq, params);
    log::debug!("{}: {} telomeric end(s)", record.id, detection.num_ends());
    let report = SeqReport {
        index,
        id: record.id,
        length: record.seq.len(),
        detection,
    };
    if let Err(e) = sender_report.send(report) {
        log::error!("Failed to send report to collector thread: {}", e);
    }
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("teloscan-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}

// 日志初始化（fern + log）

use log::LevelFilter;

/// 安装全局日志，输出到 stdout
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("tower", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()
}

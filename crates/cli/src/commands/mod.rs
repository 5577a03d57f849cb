mod check;
mod dump_snapshot;
mod lookup;
mod run;

pub use check::check;
pub use dump_snapshot::dump_snapshot;
pub use lookup::lookup;
pub use run::run;

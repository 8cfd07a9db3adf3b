//! Result materialization: loosely-typed records with alias-renamed fields.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::Record;

mod group_table;
pub use group_table::{GroupIdAllocator, GroupKey, GroupTable, MultipathGroup};

mod host_table;
pub use host_table::{ArpTable, HostDirectory};


pub use builders::ResourceRecordBuilder;

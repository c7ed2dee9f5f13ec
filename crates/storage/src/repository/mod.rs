pub mod subject_repo;
pub mod user_repo;

pub use subject_repo::SubjectRepository;
pub use user_repo::UserRepository;

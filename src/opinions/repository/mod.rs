pub mod opinion_repository;

pub mod technology_repository;

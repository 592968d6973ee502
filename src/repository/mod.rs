pub mod m3u_repository;

//! Baseline school data.
//!
//! The scraper keeps these tables fresh in production; seeding gives a new
//! install (and the test suite) a usable dataset without a scrape run.
//! Idempotent: facts are replaced, list rows are inserted only when absent.

use anyhow::Result;
use sqlx::SqlitePool;

pub async fn seed_database(pool: &SqlitePool) -> Result<()> {
    let facts = [
        (
            "visi",
            "Tersedianya generasi muda profesional, mandiri, dan berakhlaqul karimah.",
        ),
        (
            "misi",
            "Menyiapkan peserta didik agar siap kerja & berakhlak mulia.",
        ),
        (
            "alamat",
            "Jl. Pelita 1 No. 322 (Perum Buaran Indah) Kota Pekalongan Jawa Tengah",
        ),
        ("telp", "(0285) 410447"),
        ("email", "smk_sa@ymail.com"),
        ("website", "https://ponpes-smksa.sch.id/"),
    ];
    for (key, value) in facts {
        sqlx::query("INSERT OR REPLACE INTO facts (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }

    let programs = [
        (
            "TKJ",
            "Teknik Komputer dan Jaringan (TKJ)",
            "Mempelajari jaringan komputer, server administration, cybersecurity, dan maintenance hardware. Lulusan siap kerja sebagai network administrator atau technical support.",
        ),
        (
            "RPL",
            "Rekayasa Perangkat Lunak (RPL)",
            "Fokus pada pemrograman web dan mobile, database design, software development. Menggunakan teknologi terbaru seperti JavaScript, Python, dan PHP.",
        ),
        (
            "MM",
            "Multimedia (MM)",
            "Belajar desain grafis, animasi, video editing, photography, dan content creation. Cocok untuk yang kreatif dan suka dunia digital media.",
        ),
    ];
    for (code, name, description) in programs {
        sqlx::query("INSERT OR IGNORE INTO programs (code, name, description) VALUES (?, ?, ?)")
            .bind(code)
            .bind(name)
            .bind(description)
            .execute(pool)
            .await?;
    }

    let clubs = [
        (
            "Pramuka",
            "Bpk. Ahmad",
            "Membangun karakter disiplin dan kepemimpinan",
        ),
        ("Robotik", "Bpk. Budi", "Belajar merakit dan memprogram robot"),
        ("Basket", "Bpk. Catur", "Latihan basket setiap Jumat sore"),
        (
            "Marching Band",
            "Ibu. Dian",
            "Tampil di event sekolah dan kota",
        ),
        ("IT Club", "Bpk. Eko", "Ekskul untuk pengembangan skill IT"),
    ];
    for (name, supervisor, description) in clubs {
        sqlx::query("INSERT OR IGNORE INTO clubs (name, supervisor, description) VALUES (?, ?, ?)")
            .bind(name)
            .bind(supervisor)
            .bind(description)
            .execute(pool)
            .await?;
    }

    let news = [
        (
            "PPDB 2024/2025 Dibuka",
            "https://ppdb.ponpes-smksa.sch.id",
            "Pendaftaran Peserta Didik Baru tahun ajaran 2024/2025 sudah dibuka. Daftar sekarang!",
        ),
        (
            "Jurusan TKJ Meraih Sertifikasi",
            "https://ponpes-smksa.sch.id/berita/tkj-sertifikasi",
            "Jurusan TKJ mendapatkan sertifikasi internasional di bidang networking",
        ),
        (
            "Workshop Programming",
            "https://ponpes-smksa.sch.id/berita/workshop",
            "Workshop pemrograman untuk siswa RPL dengan industry expert",
        ),
    ];
    for (title, link, excerpt) in news {
        sqlx::query("INSERT OR IGNORE INTO news (title, link, excerpt) VALUES (?, ?, ?)")
            .bind(title)
            .bind(link)
            .bind(excerpt)
            .execute(pool)
            .await?;
    }

    Ok(())
}

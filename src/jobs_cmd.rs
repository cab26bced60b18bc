use std::path::Path;

use serde_json::Value;

use applytrack::jobs::{JobCache, ResumeCache, job_id};

use crate::{Ctx, read_json_input};

fn job_field<'a>(job: &'a Value, key: &str) -> &'a str {
    job.get(key).and_then(Value::as_str).unwrap_or("-")
}

fn print_job_line(job: &Value) {
    println!(
        "{} {} @ {}",
        job_id(job).as_deref().unwrap_or("-"),
        job_field(job, "title"),
        job_field(job, "company"),
    );
}

pub fn cmd_jobs_import(ctx: &Ctx, file: &Path) -> anyhow::Result<i32> {
    let jobs: Vec<Value> = read_json_input(file)?;
    let mut cache = JobCache::new(ctx.open_store()?);
    cache.try_save_results(&jobs)?;
    eprintln!("[applytrack] cached {} job(s)", jobs.len());
    Ok(0)
}

pub fn cmd_jobs_list(ctx: &Ctx) -> anyhow::Result<i32> {
    let cache = JobCache::new(ctx.open_store()?);
    let jobs = cache.try_results()?.unwrap_or_default();
    if jobs.is_empty() {
        eprintln!("[applytrack] no cached job results");
        return Ok(0);
    }
    for job in &jobs {
        print_job_line(job);
    }
    Ok(0)
}

pub fn cmd_jobs_show(ctx: &Ctx, id: &str) -> anyhow::Result<i32> {
    let cache = JobCache::new(ctx.open_store()?);
    let Some(job) = cache.find_by_id(id) else {
        eprintln!("[applytrack] job {id} not found in cached results");
        return Ok(1);
    };
    println!("{}", serde_json::to_string_pretty(&job)?);
    Ok(0)
}

pub fn cmd_jobs_favorite(ctx: &Ctx, id: &str) -> anyhow::Result<i32> {
    let mut cache = JobCache::new(ctx.open_store()?);
    let Some(job) = cache.find_by_id(id) else {
        eprintln!("[applytrack] job {id} not found in cached results");
        return Ok(1);
    };
    if cache.try_save_favorite(job)? {
        eprintln!("[applytrack] saved job {id} to favorites");
    } else {
        eprintln!("[applytrack] job {id} is already a favorite");
    }
    Ok(0)
}

pub fn cmd_jobs_favorites(ctx: &Ctx) -> anyhow::Result<i32> {
    let cache = JobCache::new(ctx.open_store()?);
    let favorites = cache.try_favorites()?;
    if favorites.is_empty() {
        eprintln!("[applytrack] no favorite jobs saved");
        return Ok(0);
    }
    for job in &favorites {
        print_job_line(job);
    }
    Ok(0)
}

pub fn cmd_resume_import(ctx: &Ctx, file: &Path) -> anyhow::Result<i32> {
    let resume: Value = read_json_input(file)?;
    let mut cache = ResumeCache::new(ctx.open_store()?);
    cache.try_save(&resume)?;
    eprintln!("[applytrack] resume saved");
    Ok(0)
}

pub fn cmd_resume_show(ctx: &Ctx) -> anyhow::Result<i32> {
    let cache = ResumeCache::new(ctx.open_store()?);
    let Some(resume) = cache.try_get()? else {
        eprintln!("[applytrack] no resume stored");
        return Ok(0);
    };
    println!("{}", serde_json::to_string_pretty(&resume)?);
    Ok(0)
}

pub fn cmd_resume_clear(ctx: &Ctx) -> anyhow::Result<i32> {
    let mut cache = ResumeCache::new(ctx.open_store()?);
    cache.try_clear()?;
    eprintln!("[applytrack] resume cleared");
    Ok(0)
}

use criterion::{criterion_group, criterion_main, Criterion};
use pinyin_core::{PinyinEngine, PinyinFormat};

fn bench_transcribe(c: &mut Criterion) {
    let engine = PinyinEngine::new();
    let text = "中国人你好世界北京欢迎你银行行长说重要时间".repeat(20);

    c.bench_function("transcribe_tone_mark", |b| {
        b.iter(|| {
            engine
                .transcribe(&text, ",", PinyinFormat::WithToneMark)
                .unwrap()
        })
    });

    c.bench_function("transcribe_tone_number", |b| {
        b.iter(|| {
            engine
                .transcribe(&text, ",", PinyinFormat::WithToneNumber)
                .unwrap()
        })
    });

    c.bench_function("short_form", |b| b.iter(|| engine.short_form(&text).unwrap()));
}

fn bench_rebuild(c: &mut Criterion) {
    c.bench_function("extend_vocabulary", |b| {
        b.iter(|| {
            let engine = PinyinEngine::new();
            engine.extend_vocabulary([("大学生".to_string(), "dà,xué,shēng".to_string())]);
            engine
        })
    });
}

criterion_group!(benches, bench_transcribe, bench_rebuild);
criterion_main!(benches);

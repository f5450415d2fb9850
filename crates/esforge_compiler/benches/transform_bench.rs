use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use esforge_compiler::{transform, transform_many, TransformRequest};
use esforge_options::{EsTarget, ParseOptions, PipelineConfig, PrintOptions, TransformOptions};

// A small React-style component using most syntax the downlevel passes touch
const TSX_SOURCE: &str = r#"
import { useState, type ReactNode } from "react";

interface Props {
    title: string;
    items?: string[];
    onSelect?: (item: string) => void;
}

enum Tone { Quiet, Loud = 4 }

export function List({ title, items = [], onSelect }: Props): ReactNode {
    const [selected, setSelected] = useState<string | null>(null);
    const visible = items.filter((item) => item.length > 0);
    const label = selected ?? "nothing";
    const extra = { ...defaults, tone: Tone.Loud };
    return (
        <section className="list" {...extra}>
            <h2>{title} ({visible.length ** 1})</h2>
            <ul>
                {visible.map((item) => (
                    <li key={item} onClick={() => { setSelected(item); onSelect?.(item); }}>
                        {`${item} / ${label}`}
                    </li>
                ))}
            </ul>
        </section>
    );
}

const defaults = { dense: false };
"#;

fn options(target: EsTarget, minify: bool) -> TransformOptions {
    TransformOptions {
        parse: ParseOptions::for_file("list.tsx"),
        pipeline: PipelineConfig { target, passes: None },
        print: PrintOptions {
            minify,
            ..Default::default()
        },
    }
}

fn bench_transform_targets(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_tsx");
    for target in [EsTarget::EsNext, EsTarget::Es2018, EsTarget::Es5] {
        let request = TransformRequest::new(TSX_SOURCE, options(target, true));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{target:?}")), &request, |b, request| {
            b.iter(|| black_box(transform(black_box(request))));
        });
    }
    group.finish();
}

fn bench_transform_many(c: &mut Criterion) {
    let requests: Vec<TransformRequest> = (0..64)
        .map(|_| TransformRequest::new(TSX_SOURCE, options(EsTarget::Es2015, false)))
        .collect();
    c.bench_function("transform_many_64", |b| {
        b.iter(|| black_box(transform_many(black_box(&requests))));
    });
}

criterion_group!(benches, bench_transform_targets, bench_transform_many);
criterion_main!(benches);

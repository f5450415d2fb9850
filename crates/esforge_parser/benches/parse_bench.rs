use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esforge_options::ParseOptions;
use esforge_parser::parse_program;

// A medium-size TypeScript module exercising most statement and type forms
const TYPESCRIPT_SOURCE: &str = r#"
import { EventEmitter } from "events";
import type { Logger } from "./logger";

export interface User {
    id: number;
    name: string;
    email?: string;
    readonly roles: Role[];
    [extra: string]: unknown;
}

export type Role = "admin" | "editor" | "viewer";
type Handler<T> = (event: T, context: { user: User }) => void | Promise<void>;
type Mutable<T> = { -readonly [K in keyof T]: T[K] };
type Unwrap<T> = T extends Promise<infer U> ? U : T;

enum Level {
    Debug,
    Info = 4,
    Warn = Info * 2,
}

export class UserStore<T extends User = User> extends EventEmitter {
    private readonly users = new Map<number, T>();
    static #instances = 0;

    constructor(private logger?: Logger) {
        super();
        UserStore.#instances++;
    }

    get size(): number {
        return this.users.size;
    }

    add(user: T): this {
        this.users.set(user.id, user);
        this.logger?.info(`added ${user.name} (${user.id})`);
        return this;
    }

    find(predicate: (user: T) => boolean): T | undefined {
        for (const user of this.users.values()) {
            if (predicate(user)) return user;
        }
        return undefined;
    }

    async *stream(batch = 10) {
        let page: T[] = [];
        for await (const user of this.users.values()) {
            page.push(user);
            if (page.length >= batch) {
                yield page;
                page = [];
            }
        }
        if (page.length) yield page;
    }
}

export function summarize(users: readonly User[], level: Level = Level.Info) {
    const { length } = users;
    const names = users.map(({ name }) => name.trim()).filter(Boolean);
    const admins = users.filter((u) => u.roles.includes("admin")).length;
    switch (level) {
        case Level.Debug:
            return { length, names, admins, raw: users };
        default:
            return length > 0 ? `${names.join(", ")} (${admins} admins)` : "none";
    }
}

namespace Validation {
    export const emailPattern = /^[^@\s]+@[^@\s]+$/i;
    export function isEmail(value: string): value is string {
        return emailPattern.test(value);
    }
}

export default UserStore;
"#;

fn bench_parse_typescript(c: &mut Criterion) {
    let options = ParseOptions::for_file("bench.ts");
    c.bench_function("parse_typescript_medium", |b| {
        b.iter(|| {
            let result = parse_program(black_box(TYPESCRIPT_SOURCE), &options);
            black_box(result);
        });
    });
}

criterion_group!(benches, bench_parse_typescript);
criterion_main!(benches);
